pub mod messages;
pub mod types;

pub use messages::{
    ChartData, MessageReply, Recipe, RecordedRecipe, RunRequest, StatusQuery, StatusReply,
};
pub use types::{InterpPoint, PidParams, ProfilePoint, TemperatureSample};
