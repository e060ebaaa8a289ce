//! Pure extraction pass over the functions map.

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::FunctionDefinition;

/// One constant input lifted out of a schedule event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedInput {
    pub function_name: String,
    /// 1-based position among the function's schedule events. Every schedule
    /// event advances the count, with or without an input, so gaps are
    /// expected when some schedules carry no payload.
    pub ordinal: u32,
    /// Normalized payload text, see [`ScheduleInput::normalize`].
    ///
    /// [`ScheduleInput::normalize`]: crate::descriptor::ScheduleInput::normalize
    pub field: String,
}

/// Walk every function's events in order and collect the constant inputs
/// attached to schedule events. Output preserves function-key order first,
/// then increasing ordinal within a function. No deduplication: two
/// functions may independently yield ordinal 1.
pub fn extract_inputs(functions: &IndexMap<String, FunctionDefinition>) -> Vec<ExtractedInput> {
    let mut inputs = Vec::new();

    for (function_name, function) in functions {
        let mut ordinal = 0u32;
        for event in &function.events {
            let Some(schedule) = &event.schedule else {
                continue;
            };
            ordinal += 1;
            if let Some(input) = &schedule.input {
                inputs.push(ExtractedInput {
                    function_name: function_name.clone(),
                    ordinal,
                    field: input.normalize(),
                });
            }
        }
    }

    debug!(
        "extracted {} constant input(s) from {} function(s)",
        inputs.len(),
        functions.len()
    );
    inputs
}
