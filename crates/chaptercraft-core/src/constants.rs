//! Application-wide constants.

/// Default backend base URL when neither `CHAPTERCRAFT_API_URL` nor `API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Path prefix shared by every backend route.
pub const API_PREFIX: &str = "/api";

/// Interval between two progress polls.
pub const PROGRESS_POLL_INTERVAL_MS: u64 = 2_000;

/// Delay between observing a finished job and navigating to the project.
pub const COMPLETION_REDIRECT_DELAY_MS: u64 = 2_000;

/// Upload size cap in megabytes.
pub const MAX_UPLOAD_MB: u64 = 25;

/// Message shown when an error body carries nothing usable.
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Message shown for a progress poll failure that is not a 404.
pub const PROGRESS_FETCH_FAILED: &str = "Failed to fetch progress";

/// Message shown when the backend has no progress record for a project.
pub const PROGRESS_NOT_FOUND: &str = "Progress tracking not found";

/// Host of the image provider whose URLs are embedded in generated books.
pub const IMAGE_PROVIDER_HOST: &str = "image.pollinations.ai";
