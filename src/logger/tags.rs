/// Log tags identifying the subsystem that emitted a message

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Discovery,
    Market,
    Holders,
    Classifier,
    Cache,
    Dispatcher,
    Alerts,
    Report,
    Api,
    Telegram,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by --debug-<key> / --verbose-<key> flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Discovery => "discovery".to_string(),
            LogTag::Market => "market".to_string(),
            LogTag::Holders => "holders".to_string(),
            LogTag::Classifier => "classifier".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Dispatcher => "dispatcher".to_string(),
            LogTag::Alerts => "alerts".to_string(),
            LogTag::Report => "report".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Telegram => "telegram".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Upper-case label without colors, used in the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Discovery => "DISCOVER".to_string(),
            LogTag::Market => "MARKET".to_string(),
            LogTag::Holders => "HOLDERS".to_string(),
            LogTag::Classifier => "CLASSIFY".to_string(),
            LogTag::Cache => "CACHE".to_string(),
            LogTag::Dispatcher => "DISPATCH".to_string(),
            LogTag::Alerts => "ALERTS".to_string(),
            LogTag::Report => "REPORT".to_string(),
            LogTag::Api => "API".to_string(),
            LogTag::Telegram => "TELEGRAM".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
