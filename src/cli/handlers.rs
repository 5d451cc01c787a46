use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::content::{DocumentKind, News, Promotion};
use crate::error::{CoopervalError, Result};
use crate::form::{NewsForm, PromotionForm, SubmitOutcome};
use crate::listing::DocumentList;
use crate::search::{filter_news, filter_promotions, SearchFilter};
use crate::store::ContentStore;

fn parse_kind(kind: &str) -> Result<DocumentKind> {
    kind.parse().map_err(CoopervalError::InvalidKind)
}

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

/// Read an image file into a staged upload (bytes + filename).
fn staged_from_path(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();
    Ok((bytes, filename))
}

/// Find a news article by id prefix or slug.
fn find_news<'a>(items: &'a [News], needle: &str) -> Option<&'a News> {
    items.iter().find(|n| {
        n.id.as_deref().map_or(false, |id| id.starts_with(needle)) || n.slug.current == needle
    })
}

/// Find a promotion by id prefix or slug.
fn find_promotion<'a>(items: &'a [Promotion], needle: &str) -> Option<&'a Promotion> {
    items.iter().find(|p| {
        p.id.as_deref().map_or(false, |id| id.starts_with(needle)) || p.slug.current == needle
    })
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_add_news(
    store: Arc<dyn ContentStore>,
    title: String,
    excerpt: String,
    content: Option<String>,
    author: Option<String>,
    category: Option<String>,
    published: Option<String>,
    images: Vec<PathBuf>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let mut form = NewsForm::new();
    form.set_field("title", &title);
    form.set_field("excerpt", &excerpt);

    if stdin {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        if !body.is_empty() {
            form.set_field("content", &body);
        }
    } else if let Some(ref content) = content {
        form.set_field("content", content);
    }

    if let Some(ref author) = author {
        form.set_field("author", author);
    }
    if let Some(ref category) = category {
        form.set_field("category", category);
    }
    if let Some(ref published) = published {
        form.set_field("publishedAt", published);
    }

    for path in &images {
        let (bytes, filename) = staged_from_path(path)?;
        form.stage_image(bytes, filename);
    }

    let outcome = form.submit(store.as_ref()).await?;
    let SubmitOutcome::Saved(id) = outcome else {
        return Ok(());
    };

    // Re-fetch the authoritative list instead of trusting the payload.
    let list = DocumentList::<News>::new(store);
    list.on_saved().await?;
    let entries = list.entries().await;

    if json {
        if let Some(saved) = entries.iter().find(|n| n.id.as_deref() == Some(id.as_str())) {
            println!("{}", serde_json::to_string_pretty(saved)?);
        }
    } else {
        println!("Created news ({}) - {}", short_id(&id), title);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_add_promotion(
    store: Arc<dyn ContentStore>,
    name: String,
    description: String,
    original_price: String,
    current_price: String,
    category: Option<String>,
    valid_until: String,
    image: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut form = PromotionForm::new();
    form.set_field("productName", &name);
    form.set_field("description", &description);
    form.set_field("originalPrice", &original_price);
    form.set_field("currentPrice", &current_price);
    form.set_field("validUntil", &valid_until);
    if let Some(ref category) = category {
        form.set_field("category", category);
    }

    if let Some(ref path) = image {
        let (bytes, filename) = staged_from_path(path)?;
        form.stage_image(bytes, filename);
    }

    let outcome = form.submit(store.as_ref()).await?;
    let SubmitOutcome::Saved(id) = outcome else {
        return Ok(());
    };

    let list = DocumentList::<Promotion>::new(store);
    list.on_saved().await?;
    let entries = list.entries().await;

    if json {
        if let Some(saved) = entries.iter().find(|p| p.id.as_deref() == Some(id.as_str())) {
            println!("{}", serde_json::to_string_pretty(saved)?);
        }
    } else {
        println!("Created promotion ({}) - {}", short_id(&id), name);
    }

    Ok(())
}

pub async fn handle_list(
    store: Arc<dyn ContentStore>,
    kind: Option<String>,
    search: Option<String>,
    category: Option<String>,
    active: bool,
    json: bool,
) -> Result<()> {
    let kind = parse_kind(kind.as_deref().unwrap_or("news"))?;
    let filter = SearchFilter {
        term: search,
        category,
        active_only: active,
    };

    match kind {
        DocumentKind::News => {
            let list = DocumentList::<News>::new(store);
            list.refresh().await?;
            let entries = list.entries().await;
            let visible = filter_news(&entries, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("No news found.");
            } else {
                println!("News:\n");
                for n in visible {
                    let id = n.id.as_deref().unwrap_or("-");
                    println!(
                        "  ({}) {} {}",
                        short_id(id),
                        n.published_at.format("%Y-%m-%d"),
                        n.title
                    );
                    if let Some(ref category) = n.category {
                        println!("      category: {}", category);
                    }
                }
            }
        }
        DocumentKind::Promotion => {
            let list = DocumentList::<Promotion>::new(store);
            list.refresh().await?;
            let entries = list.entries().await;
            let now = Utc::now();
            let visible = filter_promotions(&entries, &filter, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else if visible.is_empty() {
                println!("No promotions found.");
            } else {
                println!("Promotions:\n");
                for p in visible {
                    let id = p.id.as_deref().unwrap_or("-");
                    let discount = p.discount_percent();
                    let mut price = format!("R$ {:.2}", p.current_price);
                    if discount > 0 {
                        price.push_str(&format!(
                            " (was R$ {:.2}, -{}%)",
                            p.original_price, discount
                        ));
                    }
                    let days = p.days_remaining(now);
                    let validity = if days > 0 {
                        format!("{} days left", days)
                    } else {
                        "expired".to_string()
                    };
                    println!(
                        "  ({}) {} - {} [{}]",
                        short_id(id),
                        p.product_name,
                        price,
                        validity
                    );
                    if let Some(category) = p.category {
                        println!("      category: {}", category);
                    }
                }
            }
        }
    }

    Ok(())
}

pub async fn handle_get(
    store: Arc<dyn ContentStore>,
    kind: String,
    id: String,
    json: bool,
) -> Result<()> {
    match parse_kind(&kind)? {
        DocumentKind::News => {
            let list = DocumentList::<News>::new(store.clone());
            list.refresh().await?;
            let entries = list.entries().await;

            let found = match find_news(&entries, &id) {
                Some(n) => n.clone(),
                // Not cached under that id: try the slug query.
                None => store
                    .fetch_news_by_slug(&id)
                    .await?
                    .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&found)?);
            } else {
                println!("News ({})", found.id.as_deref().unwrap_or("-"));
                println!("Title: {}", found.title);
                println!("Slug: {}", found.slug.current);
                println!("Published: {}", found.published_at.format("%Y-%m-%d"));
                if let Some(ref author) = found.author {
                    println!("Author: {}", author);
                }
                if let Some(ref category) = found.category {
                    println!("Category: {}", category);
                }
                if !found.images.is_empty() {
                    println!("Images: {}", found.images.len());
                }
                println!("\n{}", found.excerpt);
                let body = found.body_text();
                if !body.is_empty() {
                    println!("\n{}", body);
                }
            }
        }
        DocumentKind::Promotion => {
            let list = DocumentList::<Promotion>::new(store);
            list.refresh().await?;
            let entries = list.entries().await;
            let found = find_promotion(&entries, &id)
                .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(found)?);
            } else {
                let now = Utc::now();
                println!("Promotion ({})", found.id.as_deref().unwrap_or("-"));
                println!("Product: {}", found.product_name);
                println!("Slug: {}", found.slug.current);
                let discount = found.discount_percent();
                if discount > 0 {
                    println!(
                        "Price: R$ {:.2} (was R$ {:.2}, -{}%)",
                        found.current_price, found.original_price, discount
                    );
                } else {
                    println!("Price: R$ {:.2}", found.current_price);
                }
                if let Some(category) = found.category {
                    println!("Category: {}", category);
                }
                let days = found.days_remaining(now);
                if days > 0 {
                    println!(
                        "Valid until: {} ({} days left)",
                        found.valid_until.format("%Y-%m-%d"),
                        days
                    );
                } else {
                    println!(
                        "Valid until: {} (expired)",
                        found.valid_until.format("%Y-%m-%d")
                    );
                }
                println!("Inquiry: {}", found.inquiry_link());
                println!("\n{}", found.description);
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_update_news(
    store: Arc<dyn ContentStore>,
    id: String,
    title: Option<String>,
    excerpt: Option<String>,
    content: Option<String>,
    author: Option<String>,
    category: Option<String>,
    published: Option<String>,
    images: Vec<PathBuf>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let list = DocumentList::<News>::new(store.clone());
    list.refresh().await?;
    let entries = list.entries().await;
    let found = find_news(&entries, &id)
        .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?
        .clone();

    let mut form = NewsForm::edit(found);
    if let Some(ref title) = title {
        form.set_field("title", title);
    }
    if let Some(ref excerpt) = excerpt {
        form.set_field("excerpt", excerpt);
    }
    if stdin {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        if !body.is_empty() {
            form.set_field("content", &body);
        }
    } else if let Some(ref content) = content {
        form.set_field("content", content);
    }
    if let Some(ref author) = author {
        form.set_field("author", author);
    }
    if let Some(ref category) = category {
        form.set_field("category", category);
    }
    if let Some(ref published) = published {
        form.set_field("publishedAt", published);
    }

    for path in &images {
        let (bytes, filename) = staged_from_path(path)?;
        form.stage_image(bytes, filename);
    }

    let outcome = form.submit(store.as_ref()).await?;
    let SubmitOutcome::Saved(saved_id) = outcome else {
        return Ok(());
    };

    list.on_saved().await?;
    let entries = list.entries().await;
    let updated = entries
        .iter()
        .find(|n| n.id.as_deref() == Some(saved_id.as_str()))
        .ok_or_else(|| CoopervalError::DocumentNotFound(saved_id.clone()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(updated)?);
    } else {
        println!("Updated news ({}) - {}", short_id(&saved_id), updated.title);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn handle_update_promotion(
    store: Arc<dyn ContentStore>,
    id: String,
    name: Option<String>,
    description: Option<String>,
    original_price: Option<String>,
    current_price: Option<String>,
    category: Option<String>,
    valid_until: Option<String>,
    image: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let list = DocumentList::<Promotion>::new(store.clone());
    list.refresh().await?;
    let entries = list.entries().await;
    let found = find_promotion(&entries, &id)
        .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?
        .clone();

    let mut form = PromotionForm::edit(found);
    if let Some(ref name) = name {
        form.set_field("productName", name);
    }
    if let Some(ref description) = description {
        form.set_field("description", description);
    }
    if let Some(ref original_price) = original_price {
        form.set_field("originalPrice", original_price);
    }
    if let Some(ref current_price) = current_price {
        form.set_field("currentPrice", current_price);
    }
    if let Some(ref category) = category {
        form.set_field("category", category);
    }
    if let Some(ref valid_until) = valid_until {
        form.set_field("validUntil", valid_until);
    }

    if let Some(ref path) = image {
        let (bytes, filename) = staged_from_path(path)?;
        form.stage_image(bytes, filename);
    }

    let outcome = form.submit(store.as_ref()).await?;
    let SubmitOutcome::Saved(saved_id) = outcome else {
        return Ok(());
    };

    list.on_saved().await?;
    let entries = list.entries().await;
    let updated = entries
        .iter()
        .find(|p| p.id.as_deref() == Some(saved_id.as_str()))
        .ok_or_else(|| CoopervalError::DocumentNotFound(saved_id.clone()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(updated)?);
    } else {
        println!(
            "Updated promotion ({}) - {}",
            short_id(&saved_id),
            updated.product_name
        );
    }

    Ok(())
}

pub async fn handle_delete(
    store: Arc<dyn ContentStore>,
    kind: String,
    id: String,
    force: bool,
) -> Result<()> {
    match parse_kind(&kind)? {
        DocumentKind::News => {
            let mut list = DocumentList::<News>::new(store);
            list.refresh().await?;
            let entries = list.entries().await;
            let found = find_news(&entries, &id)
                .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?;
            let full_id = found
                .id
                .clone()
                .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?;
            let title = found.title.clone();

            list.request_delete(&full_id);
            if !confirm_interactively(&format!(
                "Delete news ({}) - {}? [y/N] ",
                short_id(&full_id),
                title
            ), force)? {
                list.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }

            // The delayed reconciliation re-fetch is fire-and-forget;
            // it is discarded when the process exits.
            list.confirm_delete(&full_id).await?;
            println!("Deleted news ({}) - {}", short_id(&full_id), title);
        }
        DocumentKind::Promotion => {
            let mut list = DocumentList::<Promotion>::new(store);
            list.refresh().await?;
            let entries = list.entries().await;
            let found = find_promotion(&entries, &id)
                .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?;
            let full_id = found
                .id
                .clone()
                .ok_or_else(|| CoopervalError::DocumentNotFound(id.clone()))?;
            let name = found.product_name.clone();

            list.request_delete(&full_id);
            if !confirm_interactively(&format!(
                "Delete promotion ({}) - {}? [y/N] ",
                short_id(&full_id),
                name
            ), force)? {
                list.cancel_delete();
                println!("Cancelled.");
                return Ok(());
            }

            list.confirm_delete(&full_id).await?;
            println!("Deleted promotion ({}) - {}", short_id(&full_id), name);
        }
    }

    Ok(())
}

/// Second, explicit confirmation for deletes. `--force` stands in for
/// it; otherwise the user is prompted when stdin is a terminal.
fn confirm_interactively(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    eprintln!("{}", prompt);
    if atty::is(atty::Stream::Stdin) {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    } else {
        Err(CoopervalError::DeleteNotConfirmed(
            "use --force to delete in non-interactive mode".to_string(),
        ))
    }
}
