pub mod platform {

    pub const ORIGIN: &str = "https://www.salto-youth.net";

    pub const DEFAULT_BASE_URL: &str = "https://www.salto-youth.net/tools/otlas-partner-finding";

    pub const DEFAULT_USER_AGENT: &str = "otlas-scout/0.1";

    /// Marker substring counted in raw markup for the coarse result hint.
    pub const ORG_ITEM_MARKER: &str = "class=\"org-item\"";

    pub const PROJECT_ITEM_MARKER: &str = "class=\"project-item\"";
}

pub mod limits {

    /// Hard ceiling on `limit` sent to the platform, regardless of caller request.
    pub const MAX_RESULTS: usize = 100;

    pub const DEFAULT_MAX_RESULTS: usize = 20;

    /// Project descriptions are cut to this many characters at extraction time.
    pub const DESCRIPTION_MAX_CHARS: usize = 500;

    pub const DEFAULT_CONCURRENT_REQUESTS: usize = 3;
}

pub mod intervals {
    use std::time::Duration;

    /// Mandatory pause before every outbound request.
    pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

pub mod cache {

    pub const DEFAULT_TTL_SECONDS: u64 = 3600;
}
