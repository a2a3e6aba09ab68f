/// Order status lifecycle enum for database storage (matches CHECK constraint pattern)
///
/// - `Pending`: Order waiting on the production counter
/// - `Ready`: Order completed, either explicitly or because its last item was cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Ready,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseOrderStatusError {
    #[error("Invalid order status: '{0}'. Expected one of: pending, ready")]
    InvalidStatus(String),
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            _ => Err(ParseOrderStatusError::InvalidStatus(s.to_string())),
        }
    }
}
