//! Build metadata captured by the build script

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_metadata_is_populated() {
        assert!(build_time().ends_with("UTC"));
        assert!(!git_hash().is_empty());
    }
}
