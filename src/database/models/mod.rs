pub mod template;
pub mod user;
pub mod user_tool;

pub use template::ToolTemplate;
pub use user::User;
pub use user_tool::UserTool;
