use std::{env, error::Error, fs, path::PathBuf, process::Command};

/// The Node.js release bundled with the reference libnode.so build.
const FALLBACK_NODE_VERSION: [u32; 3] = [18, 20, 4];
const VERSION_KEYS: [&str; 3] = ["NODE_MAJOR_VERSION", "NODE_MINOR_VERSION", "NODE_PATCH_VERSION"];

struct Meta;
impl Meta {
    fn version() {
        let describe = Command::new("git")
            .arg("describe")
            .arg("--always")
            .arg("--dirty")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .and_then(|out| String::from_utf8(out.stdout).ok())
            .map(|s| s.trim().to_owned())
            .unwrap_or_else(|| "unknown".to_owned());
        println!("cargo:rustc-env=GIT_DESCRIBE={}", describe);
    }

    fn timestamp() {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        println!("cargo:rustc-env=BUILD_TIMESTAMP={}", timestamp);
    }
}

struct NodeVersion;
impl NodeVersion {
    /// Reads `#define NODE_*_VERSION n` lines out of node_version.h.
    fn from_header() -> Option<[u32; 3]> {
        let dir = env::var_os("NODE_INCLUDE_DIR")?;
        let header = PathBuf::from(dir).join("node_version.h");
        println!("cargo:rerun-if-changed={}", header.display());

        let contents = fs::read_to_string(&header).ok()?;
        let mut version = [None; 3];
        for line in contents.lines() {
            let mut parts = line.split_whitespace();
            if parts.next() != Some("#define") {
                continue;
            }
            let (Some(name), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let Some(i) = VERSION_KEYS.iter().position(|key| *key == name) {
                version[i] = value.parse().ok();
            }
        }

        Some([version[0]?, version[1]?, version[2]?])
    }

    fn resolve() -> [u32; 3] {
        let mut version = match Self::from_header() {
            Some(version) => version,
            None => {
                println!(
                    "cargo:warning=node_version.h not found via NODE_INCLUDE_DIR, assuming Node.js v{}.{}.{}",
                    FALLBACK_NODE_VERSION[0], FALLBACK_NODE_VERSION[1], FALLBACK_NODE_VERSION[2]
                );
                FALLBACK_NODE_VERSION
            }
        };

        for (i, key) in VERSION_KEYS.iter().enumerate() {
            if let Some(value) = env::var(key).ok().and_then(|v| v.parse().ok()) {
                version[i] = value;
            }
        }

        version
    }

    fn generate() -> Result<(), Box<dyn Error>> {
        let version = Self::resolve();
        let mut out = String::new();
        for (key, value) in VERSION_KEYS.iter().zip(version) {
            out.push_str(&format!("pub const {}: u32 = {};\n", key, value));
        }

        let dest = PathBuf::from(env::var("OUT_DIR")?).join("node_version.rs");
        fs::write(dest, out)?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-env-changed=NODE_INCLUDE_DIR");
    for key in VERSION_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    Meta::version();
    Meta::timestamp();

    NodeVersion::generate()?;

    Ok(())
}
