//! User-facing response strings.
//!
//! The web UI matches on these, so changing one is an API change.

pub const FIELDS_REQUIRED: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH: &str = "The two passwords do not match";
pub const ALREADY_REGISTERED: &str = "Username or email is already registered";
pub const REGISTER_SUCCESS: &str = "Registration successful";

pub const CREDENTIALS_REQUIRED: &str = "Please enter your username and password";
pub const INVALID_CREDENTIALS: &str = "Incorrect username or password";
pub const LOGIN_SUCCESS: &str = "Login successful";

pub const LOGIN_REQUIRED: &str = "Please log in first";
pub const FORBIDDEN: &str = "You do not have permission to view this page";

pub const CONTACT_SUCCESS: &str = "Your message has been sent";

pub const INVALID_REQUEST: &str = "Invalid request body";
pub const SYSTEM_ERROR: &str = "System error, please try again later";
