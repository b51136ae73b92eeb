//! Build identity
//!
//! The version string logged at startup and the product token the gateway
//! sends to the upstream status service.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product name used in the upstream `User-Agent`
pub const PRODUCT: &str = env!("CARGO_PKG_NAME");

pub fn get_version() -> &'static str {
    VERSION
}

/// `embed-gateway/<version>`, the default upstream `User-Agent`
pub fn product_token() -> String {
    format!("{PRODUCT}/{VERSION}")
}

/// Version plus the commit and build date injected at build time, if any
pub fn get_detailed_version() -> String {
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("BUILD_DATE").unwrap_or("unknown");

    format!("{VERSION} ({git_hash}@{build_date})")
}
