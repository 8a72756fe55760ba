use std::fmt;

#[derive(Debug, Clone)]
pub enum HashlinkerError {
    FileOperation(String),
    Serialization(String),
    Validation(String),
    Configuration(String),
    Unauthorized(String),
    NotFound(String),
    Persistence(String),
}

impl HashlinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            HashlinkerError::FileOperation(_) => "E001",
            HashlinkerError::Serialization(_) => "E002",
            HashlinkerError::Validation(_) => "E003",
            HashlinkerError::Configuration(_) => "E004",
            HashlinkerError::Unauthorized(_) => "E005",
            HashlinkerError::NotFound(_) => "E006",
            HashlinkerError::Persistence(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            HashlinkerError::FileOperation(_) => "File Operation Error",
            HashlinkerError::Serialization(_) => "Serialization Error",
            HashlinkerError::Validation(_) => "Validation Error",
            HashlinkerError::Configuration(_) => "Configuration Error",
            HashlinkerError::Unauthorized(_) => "Unauthorized",
            HashlinkerError::NotFound(_) => "Resource Not Found",
            HashlinkerError::Persistence(_) => "Persistence Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            HashlinkerError::FileOperation(msg)
            | HashlinkerError::Serialization(msg)
            | HashlinkerError::Validation(msg)
            | HashlinkerError::Configuration(msg)
            | HashlinkerError::Unauthorized(msg)
            | HashlinkerError::NotFound(msg)
            | HashlinkerError::Persistence(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server / CLI 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HashlinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HashlinkerError {}

// 便捷的构造函数
impl HashlinkerError {
    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::Validation(msg.into())
    }

    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::Configuration(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::NotFound(msg.into())
    }

    pub fn persistence<T: Into<String>>(msg: T) -> Self {
        HashlinkerError::Persistence(msg.into())
    }
}

impl From<std::io::Error> for HashlinkerError {
    fn from(err: std::io::Error) -> Self {
        HashlinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HashlinkerError {
    fn from(err: serde_json::Error) -> Self {
        HashlinkerError::Serialization(err.to_string())
    }
}

impl From<::config::ConfigError> for HashlinkerError {
    fn from(err: ::config::ConfigError) -> Self {
        HashlinkerError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HashlinkerError>;
