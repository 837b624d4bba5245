//! Bot-level settings.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Post for real. When `false`, notifications are printed instead.
    pub production: bool,
    /// Location of the persisted notification record.
    pub state_path: PathBuf,
    /// Optional file receiving a copy of the log output.
    pub log_file: Option<PathBuf>,
    /// `User-Agent` sent with every outbound request.
    pub user_agent: String,
}
