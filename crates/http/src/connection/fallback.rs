/// What a connection answers when there is nothing to dispatch: the request
/// could not be parsed, or no route accepted it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// Send nothing and close the connection.
    #[default]
    Silent,
    /// Answer `400 Bad Request` to malformed requests and close; answer
    /// `404 Not Found` to unmatched ones and keep the usual keep-alive rule.
    Status,
}
