/// Per-request view handed to the access check by the host framework.
///
/// `ip` is the client address exactly as the framework reports it; it is only
/// parsed when the country check actually runs.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub ip: &'a str,
    pub path: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn new(ip: &'a str) -> Self {
        Self { ip, path: "/" }
    }

    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = path;
        self
    }
}
