use url::{form_urlencoded, Url};

/// Route prefix shared by every versioned endpoint
pub const API_PREFIX: &str = "/api/v1";

/// Hyperlink builder for dumped resources
#[derive(Debug, Clone, Default)]
pub struct Links {
    base: Option<Url>,
}

impl Links {
    /// Relative links when `public_url` is `None`, absolute ones otherwise
    pub fn new(public_url: Option<&str>) -> Result<Self, url::ParseError> {
        let base = public_url.map(Url::parse).transpose()?;
        Ok(Self { base })
    }

    pub fn user(&self, id: i64) -> String {
        self.href(&format!("{}/auth/users/{}", API_PREFIX, id))
    }

    pub fn bucketlists(&self) -> String {
        self.href(&format!("{}/bucketlists/", API_PREFIX))
    }

    pub fn bucketlist(&self, id: i64) -> String {
        self.href(&format!("{}/bucketlists/{}", API_PREFIX, id))
    }

    pub fn items(&self, bucketlist_id: i64) -> String {
        self.href(&format!("{}/bucketlists/{}/items/", API_PREFIX, bucketlist_id))
    }

    pub fn item(&self, bucketlist_id: i64, id: i64) -> String {
        self.href(&format!("{}/bucketlists/{}/items/{}", API_PREFIX, bucketlist_id, id))
    }

    pub fn tags(&self, bucketlist_id: i64) -> String {
        self.href(&format!("{}/bucketlists/{}/tags/", API_PREFIX, bucketlist_id))
    }

    pub fn tag(&self, bucketlist_id: i64, id: i64) -> String {
        self.href(&format!("{}/bucketlists/{}/tags/{}", API_PREFIX, bucketlist_id, id))
    }

    /// Append url-encoded query parameters to a generated link
    pub fn with_query(link: String, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return link;
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish();
        format!("{}?{}", link, query)
    }

    fn href(&self, path: &str) -> String {
        match &self.base {
            Some(base) => base
                .join(path)
                .map(String::from)
                .unwrap_or_else(|_| path.to_string()),
            None => path.to_string(),
        }
    }
}
