//! Container image build and tagging.

use ponzu_common::config::PonzuConfig;
use ponzu_common::error::Result;

use crate::process::{self, Invocation, ProcessRunner};

/// Build context passed to the container runtime.
const BUILD_CONTEXT: &str = ".";

/// Ordered tags applied to the built image. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTagSet(Vec<String>);

impl ImageTagSet {
    /// Creates a tag set preserving the given order.
    #[must_use]
    pub const fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    /// Returns the tags in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns whether no tags were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ImageTagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Arguments for `build -f <dockerfile> [-t <tag>]... <context>`.
#[must_use]
pub fn image_build_args(dockerfile: &str, tags: &ImageTagSet, context: &str) -> Vec<String> {
    let mut args = vec!["build".to_string(), "-f".to_string(), dockerfile.to_string()];
    for tag in tags.as_slice() {
        args.push("-t".to_string());
        args.push(tag.clone());
    }
    args.push(context.to_string());
    args
}

/// Packages the prebuilt binary into an image with the given tags.
///
/// # Errors
///
/// Returns a launch error if the container runtime cannot start, or an
/// exit error if the image build fails.
pub fn build_image<R: ProcessRunner + ?Sized>(
    runner: &R,
    config: &PonzuConfig,
    tags: &ImageTagSet,
) -> Result<()> {
    tracing::info!(
        dockerfile = %config.dockerfile,
        tags = ?tags.as_slice(),
        "building container image"
    );
    let invocation = Invocation::new(&config.container_runtime)
        .args(image_build_args(&config.dockerfile, tags, BUILD_CONTEXT))
        .current_dir(&config.project_dir);
    process::run_checked(runner, &invocation)
}
