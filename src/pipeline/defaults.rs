//! Values used when a field is neither authored on the node nor driven by a
//! configuration node. Freshly placed nodes start out with the same values.

pub const LISTENER_HOST: &str = "0.0.0.0";
pub const SENDER_HOST: &str = "localhost";
pub const HTTP_PORT: u16 = 8080;
pub const HTTP_PATH: &str = "/";
pub const TCP_LISTENER_PORT: u16 = 6661;
pub const TCP_SENDER_PORT: u16 = 6662;

pub const INPUT_DIRECTORY: &str = "./input";
pub const FILE_PATTERN: &str = "*";
pub const POLL_INTERVAL_MS: u64 = 5_000;
pub const TIMER_INTERVAL_MS: u64 = 60_000;

pub const HL7_VERSION: &str = "2.5";
pub const FHIR_VERSION: &str = "R4";
pub const FHIR_RESOURCE_TYPE: &str = "Bundle";
pub const SCRIPT_TIMEOUT_MS: u64 = 5_000;

pub const OUTPUT_PATH: &str = "./output";
pub const OUTPUT_FILENAME: &str = "message_${timestamp}.txt";
pub const HTTP_SENDER_URL: &str = "http://localhost:8080/";
pub const HTTP_METHOD: &str = "POST";
pub const SEND_TIMEOUT_MS: u64 = 30_000;
pub const DATABASE_TABLE: &str = "messages";

pub const MAX_RETRIES: u32 = 3;
pub const CHANNEL_NAME: &str = "Untitled Channel";
