#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// A message carried by a navigation transition, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationNotice {
    pub message: String,
}

impl From<NavigationNotice> for Notice {
    fn from(value: NavigationNotice) -> Self {
        Notice::success(value.message)
    }
}
