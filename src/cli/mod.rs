mod commands;
mod handlers;

pub use commands::{AddCommand, AddEntity, Cli, Commands, UpdateCommand, UpdateEntity};
pub use handlers::{
    handle_add_news, handle_add_promotion, handle_delete, handle_get, handle_list,
    handle_update_news, handle_update_promotion,
};
