use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cooperval")]
#[command(version, about = "Content admin for the Cooperval site")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new document
    Add(AddCommand),

    /// List documents
    List {
        /// Document kind (news, promotion)
        #[arg(value_name = "KIND")]
        kind: Option<String>,

        /// Case-insensitive search over titles and body text
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Filter by exact category label
        #[arg(long)]
        category: Option<String>,

        /// Only promotions that are still valid
        #[arg(long)]
        active: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single document by id prefix or slug
    Get {
        /// Document kind (news, promotion)
        kind: String,

        /// Document id prefix, or a news slug
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update an existing document
    Update(UpdateCommand),

    /// Delete a document
    Delete {
        /// Document kind (news, promotion)
        kind: String,

        /// Document id prefix
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub entity: AddEntity,
}

#[derive(Subcommand, Debug)]
pub enum AddEntity {
    /// Add a news article
    News {
        /// Article title
        title: String,

        /// Short summary shown in listings
        #[arg(long)]
        excerpt: String,

        /// Body text; paragraphs separated by blank lines
        #[arg(long)]
        content: Option<String>,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Category label
        #[arg(long)]
        category: Option<String>,

        /// Publication date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        published: Option<String>,

        /// Image file to upload and attach (can be specified multiple times)
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        /// Read body text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a product promotion
    Promotion {
        /// Product name
        name: String,

        /// Product description
        #[arg(long)]
        description: String,

        /// Price before the promotion
        #[arg(long = "original-price")]
        original_price: String,

        /// Promotional price
        #[arg(long = "current-price")]
        current_price: String,

        /// Category (Sementes, Adubo, Ferramentas, Ração, Medicamentos, Outros)
        #[arg(long)]
        category: Option<String>,

        /// Last day of validity (YYYY-MM-DD)
        #[arg(long = "valid-until")]
        valid_until: String,

        /// Product image file to upload
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct UpdateCommand {
    #[command(subcommand)]
    pub entity: UpdateEntity,
}

#[derive(Subcommand, Debug)]
pub enum UpdateEntity {
    /// Update a news article
    News {
        /// Document id prefix
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        published: Option<String>,

        /// Additional image file to upload (can be specified multiple times)
        #[arg(long = "image")]
        images: Vec<PathBuf>,

        /// Read body text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update a product promotion
    Promotion {
        /// Document id prefix
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "original-price")]
        original_price: Option<String>,

        #[arg(long = "current-price")]
        current_price: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Last day of validity (YYYY-MM-DD)
        #[arg(long = "valid-until")]
        valid_until: Option<String>,

        /// Replacement product image file to upload
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
