//! Node.js version constants, fixed when the library is built.

include!(concat!(env!("OUT_DIR"), "/node_version.rs"));

pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const GIT_DESCRIBE: &str = env!("GIT_DESCRIBE");

/// Formats the embedded Node.js version, e.g. `Node.js v18.20.4`.
pub fn node_version() -> String {
    format!(
        "Node.js v{}.{}.{}",
        NODE_MAJOR_VERSION, NODE_MINOR_VERSION, NODE_PATCH_VERSION
    )
}
