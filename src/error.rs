#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Status { status: u16, message: Option<String> },
    Server(String),
    InvalidForm(String),
    InvalidUrl(String),
    Render(askama::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Http(err) => write!(f, "Request failed: {err}"),
            ClientError::Status {
                status,
                message: Some(msg),
            } => write!(f, "HTTP error! status: {status}: {msg}"),
            ClientError::Status {
                status,
                message: None,
            } => write!(f, "HTTP error! status: {status}"),
            ClientError::Server(msg) => write!(f, "{msg}"),
            ClientError::InvalidForm(msg) => write!(f, "Invalid form: {msg}"),
            ClientError::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            ClientError::Render(err) => write!(f, "Render error: {err}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

impl From<askama::Error> for ClientError {
    fn from(err: askama::Error) -> Self {
        ClientError::Render(err)
    }
}
