/// Backend location and endpoint paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub ops_path: String,
    pub filters_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8000".to_string(),
            ops_path: "/api/ops".to_string(),
            filters_path: "/api/filtros".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base: std::env::var("OPS_API_BASE").unwrap_or(defaults.api_base),
            ops_path: std::env::var("OPS_PATH").unwrap_or(defaults.ops_path),
            filters_path: std::env::var("FILTERS_PATH").unwrap_or(defaults.filters_path),
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Absolute drill-down URL for a table row.
    pub fn detail_url(&self, op_code: &str) -> String {
        self.endpoint(&crate::view::detail_path(op_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let cfg = Config::default().with_api_base("http://ops.local/");
        assert_eq!(cfg.endpoint(&cfg.ops_path), "http://ops.local/api/ops");
        assert_eq!(cfg.detail_url("OP-12"), "http://ops.local/op/OP-12");
    }
}
