//! Well-known storage keys shared with the web client.

/// JSON envelope holding the submitted freelancer profile.
pub const FREELANCER_PROFILE: &str = "freelancerProfile";

/// `"true"` once a profile has been submitted.
pub const PROFILE_SUBMITTED: &str = "profileSubmitted";

pub const USER_NAME: &str = "userName";
pub const USER_EMAIL: &str = "userEmail";
pub const USER_ROLE: &str = "userRole";

/// Bearer credential consumed by the REST client.
pub const TOKEN: &str = "token";

/// Keys cleared on sign-out.
pub const SESSION_KEYS: [&str; 4] = [USER_NAME, USER_EMAIL, USER_ROLE, TOKEN];
