#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    DuplicateStep { vertex: usize },
    IncompleteRoute { expected: usize, actual: usize },
    MissingEdge { from: usize, to: usize },
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::DuplicateStep { vertex } => {
                write!(f, "Vertex '{}' is visited more than once", vertex)
            }
            RouteError::IncompleteRoute { expected, actual } => write!(
                f,
                "Route length ({}) does not match number of vertices ({})",
                actual, expected
            ),
            RouteError::MissingEdge { from, to } => {
                write!(f, "No edge from vertex '{}' to vertex '{}'", from, to)
            }
        }
    }
}

impl std::error::Error for RouteError {}

pub type RouteResult<T> = std::result::Result<T, RouteError>;
