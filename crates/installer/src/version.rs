//! Product versions and the declarative version table.
//!
//! One table owns everything that varies by version: the release tag on
//! the archive host and the build commands to run after extraction. The
//! host strips the leading `v` from tag downloads, so local archive file
//! names and the unpacked root directory use the bare form while URLs use
//! the tag itself.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

/// A post-extraction build command: program plus arguments.
pub(crate) type BuildCommand = (&'static str, &'static [&'static str]);

const NPM_INSTALL: BuildCommand = ("npm", &["install"]);
const GRUNT_BABEL_LESS: BuildCommand = ("grunt", &["babel", "less"]);
const NPM_RUN_BUILD: BuildCommand = ("npm", &["run", "build"]);

/// Installable product versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductVersion {
    V1_2,
    V2_0,
    V3_0,
    V3_1,
    V3_2,
    V3_3,
    V3_4,
    V3_5,
}

struct VersionSpec {
    tag: &'static str,
    build_commands: &'static [BuildCommand],
}

// Unmapped versions resolve to the newest tag with no build step.
static FALLBACK_SPEC: VersionSpec = VersionSpec {
    tag: "v3.5",
    build_commands: &[],
};

static VERSION_TABLE: Lazy<HashMap<ProductVersion, VersionSpec>> = Lazy::new(|| {
    HashMap::from([
        (
            ProductVersion::V1_2,
            VersionSpec { tag: "v1.2", build_commands: &[] },
        ),
        (
            ProductVersion::V2_0,
            VersionSpec { tag: "v2.0.1", build_commands: &[] },
        ),
        (
            ProductVersion::V3_0,
            VersionSpec { tag: "v3.0.4", build_commands: &[] },
        ),
        (
            ProductVersion::V3_1,
            VersionSpec { tag: "v3.1.1", build_commands: &[] },
        ),
        (
            ProductVersion::V3_2,
            VersionSpec { tag: "v3.2.1", build_commands: &[] },
        ),
        (
            ProductVersion::V3_3,
            VersionSpec { tag: "v3.3.2", build_commands: &[] },
        ),
        // 3.4 and 3.5 ship untranspiled sources and need node/npm (and for
        // 3.4, grunt-cli) on the PATH to build after extraction.
        (
            ProductVersion::V3_4,
            VersionSpec {
                tag: "v3.4.2",
                build_commands: &[NPM_INSTALL, GRUNT_BABEL_LESS],
            },
        ),
        (
            ProductVersion::V3_5,
            VersionSpec {
                tag: "v3.5",
                build_commands: &[NPM_INSTALL, NPM_RUN_BUILD],
            },
        ),
    ])
});

impl ProductVersion {
    /// Newest version this installer knows about.
    pub const NEWEST: ProductVersion = ProductVersion::V3_5;

    pub const ALL: [ProductVersion; 8] = [
        ProductVersion::V1_2,
        ProductVersion::V2_0,
        ProductVersion::V3_0,
        ProductVersion::V3_1,
        ProductVersion::V3_2,
        ProductVersion::V3_3,
        ProductVersion::V3_4,
        ProductVersion::V3_5,
    ];

    fn spec(self) -> &'static VersionSpec {
        VERSION_TABLE.get(&self).unwrap_or(&FALLBACK_SPEC)
    }

    /// Release tag on the archive host, e.g. `v3.5`.
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Tag with the leading `v` stripped. The archive host strips it from
    /// tag downloads, so this form names local archive files and the
    /// unpacked root directory.
    pub fn bare(self) -> &'static str {
        self.spec().tag.trim_start_matches('v')
    }

    pub(crate) fn build_commands(self) -> &'static [BuildCommand] {
        self.spec().build_commands
    }

    /// Short selector string, e.g. `3.5`.
    pub fn selector(self) -> &'static str {
        match self {
            ProductVersion::V1_2 => "1.2",
            ProductVersion::V2_0 => "2.0",
            ProductVersion::V3_0 => "3.0",
            ProductVersion::V3_1 => "3.1",
            ProductVersion::V3_2 => "3.2",
            ProductVersion::V3_3 => "3.3",
            ProductVersion::V3_4 => "3.4",
            ProductVersion::V3_5 => "3.5",
        }
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for ProductVersion {
    type Err = Infallible;

    /// Unknown selector strings resolve to the newest known version
    /// rather than an error.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1.2" => ProductVersion::V1_2,
            "2.0" => ProductVersion::V2_0,
            "3.0" => ProductVersion::V3_0,
            "3.1" => ProductVersion::V3_1,
            "3.2" => ProductVersion::V3_2,
            "3.3" => ProductVersion::V3_3,
            "3.4" => ProductVersion::V3_4,
            "3.5" => ProductVersion::V3_5,
            _ => ProductVersion::NEWEST,
        })
    }
}
