use reqwest::StatusCode;

#[derive(Debug)]
pub enum BoardError {
    TokenNotFound(String),
    ConfigNotFound(String),
    /// The request never produced an HTTP response
    Transport(reqwest::Error),
    Http {
        status: StatusCode,
        body: String,
    },
    /// The service answered with an error payload instead of data
    Api {
        code: Option<String>,
        messages: Vec<String>,
    },
    /// The response did not have the expected shape
    Protocol(String),
}

impl BoardError {
    /// Whether repeating the same call could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            BoardError::Transport(_) => true,
            BoardError::Http { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            BoardError::TokenNotFound(_)
            | BoardError::ConfigNotFound(_)
            | BoardError::Api { .. }
            | BoardError::Protocol(_) => false,
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(err: reqwest::Error) -> Self {
        BoardError::Transport(err)
    }
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::TokenNotFound(msg) => {
                writeln!(f, "Board Authentication Error")?;
                writeln!(f, "──────────────────────────")?;
                write!(f, "🔑 {msg}\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → Set token directly: export MONDAY_TOKEN=your_token")?;
                writeln!(f, "   → Or add MONDAY_TOKEN=your_token to a .env file")?;
                write!(f, "   → Create a token under Developers → My access tokens")
            }
            BoardError::ConfigNotFound(msg) => {
                writeln!(f, "Board Configuration Error")?;
                writeln!(f, "─────────────────────────")?;
                write!(f, "📂 {msg}\n\n")?;
                writeln!(f, "🔧 QUICK FIXES:")?;
                writeln!(f, "   → Set environment variables: export BOARD_ID=1234567890")?;
                writeln!(f, "   → Pass it on the command line: board-sweep --board-id 1234567890")?;
                write!(f, "   → Or add [board] board_id = 1234567890 to board-sweep.toml")
            }
            BoardError::Transport(err) => {
                writeln!(f, "Board Network Error")?;
                writeln!(f, "───────────────────")?;
                write!(f, "🌐 {err}\n\n")?;
                writeln!(f, "🔧 TROUBLESHOOTING:")?;
                writeln!(f, "   → Check internet connectivity")?;
                writeln!(f, "   → Check proxy settings (HTTPS_PROXY)")?;
                write!(f, "   → Re-run with --retry to retry transient failures")
            }
            BoardError::Http { status, body } => {
                writeln!(f, "Board API Error")?;
                writeln!(f, "───────────────")?;
                writeln!(f, "🌐 HTTP {status}")?;
                if !body.is_empty() {
                    writeln!(f, "   {body}")?;
                }
                writeln!(f)?;
                match status.as_u16() {
                    401 | 403 => {
                        writeln!(f, "🔧 AUTHENTICATION FAILED:")?;
                        writeln!(f, "   → Token is invalid, expired or lacks access to the board")?;
                        write!(f, "   → Generate a new token and export MONDAY_TOKEN")
                    }
                    429 => {
                        writeln!(f, "🔧 RATE LIMITED:")?;
                        writeln!(f, "   → Lower rate_limit.requests_per_minute")?;
                        write!(f, "   → Re-run with --retry to back off automatically")
                    }
                    _ => {
                        writeln!(f, "🔧 TROUBLESHOOTING:")?;
                        writeln!(f, "   → Check the API endpoint in board.api_url")?;
                        write!(f, "   → Retry later if the service is degraded")
                    }
                }
            }
            BoardError::Api { code, messages } => {
                writeln!(f, "Board API Error")?;
                writeln!(f, "───────────────")?;
                if let Some(code) = code {
                    writeln!(f, "🌐 {code}")?;
                }
                for message in messages {
                    writeln!(f, "   {message}")?;
                }
                writeln!(f)?;
                writeln!(f, "🔧 TROUBLESHOOTING:")?;
                writeln!(f, "   → Check that BOARD_ID refers to a board the token can access")?;
                write!(f, "   → Check that NUMBER_COLUMN_ID names a numbers column on that board")
            }
            BoardError::Protocol(msg) => {
                writeln!(f, "Unexpected Board API Response")?;
                writeln!(f, "─────────────────────────────")?;
                write!(f, "📦 {msg}")
            }
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
