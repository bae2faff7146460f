//! # Script-Call Builders
//!
//! This module provides [`ScriptCall`], a typed builder for the payload
//! strings the MixProcessing scripting API accepts.
//!
//! ## Use Case
//!
//! The remote API executes script expressions of the form
//! `mp.<method>(<args>);` — for example `mp.sketchAlpha('Clock',0.5);` —
//! with string arguments single-quoted. Assembling those by hand invites
//! quoting mistakes, so every remotely callable scripting-API method gets a
//! builder here. The rendered expression is the `payload` argument of
//! [`crate::client::ApiClient::call`]; use
//! [`call_script`](crate::client::ApiClient::call_script) to skip the
//! indirection.

use std::fmt;

/// A rendered scripting-API call, ready to be sent as a request payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCall {
    expr: String,
}

/// A single argument of a scripting-API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Str(String),
    Num(f64),
    Int(i64),
    Bool(bool),
}

impl ScriptArg {
    fn render(&self) -> String {
        match self {
            // Single quotes per the generated JS wrappers; embedded quotes
            // and backslashes are escaped.
            ScriptArg::Str(s) => {
                format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            ScriptArg::Num(v) => v.to_string(),
            ScriptArg::Int(v) => v.to_string(),
            ScriptArg::Bool(v) => v.to_string(),
        }
    }
}

impl From<&str> for ScriptArg {
    fn from(value: &str) -> Self {
        ScriptArg::Str(value.to_string())
    }
}

impl From<String> for ScriptArg {
    fn from(value: String) -> Self {
        ScriptArg::Str(value)
    }
}

impl From<f64> for ScriptArg {
    fn from(value: f64) -> Self {
        ScriptArg::Num(value)
    }
}

impl From<f32> for ScriptArg {
    fn from(value: f32) -> Self {
        ScriptArg::Num(value as f64)
    }
}

impl From<i64> for ScriptArg {
    fn from(value: i64) -> Self {
        ScriptArg::Int(value)
    }
}

impl From<bool> for ScriptArg {
    fn from(value: bool) -> Self {
        ScriptArg::Bool(value)
    }
}

impl fmt::Display for ScriptCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl ScriptCall {
    fn new(method: &str, args: Vec<ScriptArg>) -> Self {
        let rendered: Vec<String> = args.iter().map(ScriptArg::render).collect();
        Self {
            expr: format!("mp.{}({});", method, rendered.join(",")),
        }
    }

    /// The rendered expression.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    // --- Channel Calls ---

    /// Builds a `channelCreateGroup` call.
    ///
    /// # Arguments
    ///
    /// * `new_name` - Name of the group channel to create.
    /// * `source_channels` - Names of the channels joined into the group.
    pub fn channel_create_group(new_name: &str, source_channels: &[&str]) -> Self {
        let mut args = vec![ScriptArg::from(new_name)];
        args.extend(source_channels.iter().map(|c| ScriptArg::from(*c)));
        Self::new("channelCreateGroup", args)
    }

    /// Builds a `channelOn` call: enable output of a channel.
    pub fn channel_on(channel_name: &str) -> Self {
        Self::new("channelOn", vec![channel_name.into()])
    }

    /// Builds a `channelOff` call: disable output of a channel.
    pub fn channel_off(channel_name: &str) -> Self {
        Self::new("channelOff", vec![channel_name.into()])
    }

    /// Builds a `channelEditing` call: switch the renderer to channel
    /// editing mode.
    pub fn channel_editing() -> Self {
        Self::new("channelEditing", vec![])
    }

    /// Builds a `channelNormal` call: leave channel editing mode.
    pub fn channel_normal() -> Self {
        Self::new("channelNormal", vec![])
    }

    /// Builds a `channelIsEditing` query.
    pub fn channel_is_editing() -> Self {
        Self::new("channelIsEditing", vec![])
    }

    /// Builds a `channelRename` call.
    pub fn channel_rename(old_name: &str, new_name: &str) -> Self {
        Self::new("channelRename", vec![old_name.into(), new_name.into()])
    }

    /// Builds a `channelBlacking` call: paint a channel black.
    pub fn channel_blacking(channel_name: &str) -> Self {
        Self::new("channelBlacking", vec![channel_name.into()])
    }

    /// Builds a `channelRemove` call.
    pub fn channel_remove(channel_name: &str) -> Self {
        Self::new("channelRemove", vec![channel_name.into()])
    }

    // --- Renderer Calls ---

    /// Builds a `rendererForceRefresh` call.
    pub fn renderer_force_refresh() -> Self {
        Self::new("rendererForceRefresh", vec![])
    }

    /// Builds a `rendererGetFrameRate` query.
    pub fn renderer_get_frame_rate() -> Self {
        Self::new("rendererGetFrameRate", vec![])
    }

    /// Builds a `rendererSetFrameRate` call.
    pub fn renderer_set_frame_rate(frame_rate: f32) -> Self {
        Self::new("rendererSetFrameRate", vec![frame_rate.into()])
    }

    // --- Sketch Calls ---

    /// Builds a `sketchAlpha` call.
    ///
    /// # Arguments
    ///
    /// * `sketch_name` - The sketch to fade.
    /// * `value` - Alpha in the range `0.0..=1.0`.
    pub fn sketch_alpha(sketch_name: &str, value: f32) -> Self {
        Self::new("sketchAlpha", vec![sketch_name.into(), value.into()])
    }

    /// Builds a `sketchSetChannel` call: assign a sketch to an output
    /// channel without restarting it.
    pub fn sketch_set_channel(sketch_name: &str, channel_name: &str) -> Self {
        Self::new(
            "sketchSetChannel",
            vec![sketch_name.into(), channel_name.into()],
        )
    }

    /// Builds a `sketchSetChannelRestart` call: assign a sketch to an
    /// output channel and restart it.
    pub fn sketch_set_channel_restart(sketch_name: &str, channel_name: &str) -> Self {
        Self::new(
            "sketchSetChannelRestart",
            vec![sketch_name.into(), channel_name.into()],
        )
    }

    /// Builds a `sketchRemove` call: take a sketch off its channel.
    pub fn sketch_remove(sketch_name: &str) -> Self {
        Self::new("sketchRemove", vec![sketch_name.into()])
    }

    /// Builds a `sketchRestart` call.
    pub fn sketch_restart(sketch_name: &str) -> Self {
        Self::new("sketchRestart", vec![sketch_name.into()])
    }

    /// Builds a `sketchSetVar` call: set a public variable of a running
    /// sketch.
    ///
    /// # Arguments
    ///
    /// * `sketch_name` - The target sketch.
    /// * `var_name` - Name of the sketch's public field.
    /// * `value` - New value; strings, numbers and booleans are supported.
    pub fn sketch_set_var(sketch_name: &str, var_name: &str, value: impl Into<ScriptArg>) -> Self {
        Self::new(
            "sketchSetVar",
            vec![sketch_name.into(), var_name.into(), value.into()],
        )
    }

    /// Builds a `sketchGetVar` query.
    pub fn sketch_get_var(sketch_name: &str, var_name: &str) -> Self {
        Self::new("sketchGetVar", vec![sketch_name.into(), var_name.into()])
    }

    /// Builds a `sketchGetVars` query: list a sketch's public variables.
    pub fn sketch_get_vars(sketch_name: &str) -> Self {
        Self::new("sketchGetVars", vec![sketch_name.into()])
    }

    /// Builds a `sketchGetFrameRate` query.
    pub fn sketch_get_frame_rate(sketch_name: &str) -> Self {
        Self::new("sketchGetFrameRate", vec![sketch_name.into()])
    }

    /// Builds a `sketchGetFrameCount` query.
    pub fn sketch_get_frame_count(sketch_name: &str) -> Self {
        Self::new("sketchGetFrameCount", vec![sketch_name.into()])
    }

    /// Builds a `sketchKeyEventsOn` call: toggle keyboard event delivery.
    pub fn sketch_key_events_on(sketch_name: &str, value: bool) -> Self {
        Self::new("sketchKeyEventsOn", vec![sketch_name.into(), value.into()])
    }

    /// Builds a `sketchMouseEventsOn` call: toggle mouse event delivery.
    pub fn sketch_mouse_events_on(sketch_name: &str, value: bool) -> Self {
        Self::new(
            "sketchMouseEventsOn",
            vec![sketch_name.into(), value.into()],
        )
    }

    // --- System Calls ---

    /// Builds a `systemLoad` call: compile and load a sketch from a path on
    /// the server.
    pub fn system_load(sketch_path: &str) -> Self {
        Self::new("systemLoad", vec![sketch_path.into()])
    }

    /// Builds a `systemListSketches` query.
    pub fn system_list_sketches() -> Self {
        Self::new("systemListSketches", vec![])
    }

    /// Builds a `systemListChannels` query.
    pub fn system_list_channels() -> Self {
        Self::new("systemListChannels", vec![])
    }

    /// Builds a `systemKeyPressed` call.
    pub fn system_key_pressed(key: char) -> Self {
        Self::new("systemKeyPressed", vec![key.to_string().into()])
    }

    /// Builds a `systemKeyReleased` call.
    pub fn system_key_released(key: char) -> Self {
        Self::new("systemKeyReleased", vec![key.to_string().into()])
    }

    /// Builds a `systemKeyTyped` call.
    pub fn system_key_typed(key: char) -> Self {
        Self::new("systemKeyTyped", vec![key.to_string().into()])
    }

    /// Builds a `systemSetMouse` call: move the virtual mouse cursor.
    pub fn system_set_mouse(x: i64, y: i64) -> Self {
        Self::new("systemSetMouse", vec![x.into(), y.into()])
    }

    /// Builds a `systemDoMouseClick` call.
    pub fn system_do_mouse_click() -> Self {
        Self::new("systemDoMouseClick", vec![])
    }

    /// Builds a `systemPrintln` call: print to the server's console.
    pub fn system_println(text: &str) -> Self {
        Self::new("systemPrintln", vec![text.into()])
    }

    /// Builds a `systemSleep` call.
    pub fn system_sleep(millis: i64) -> Self {
        Self::new("systemSleep", vec![millis.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_no_arg_call() {
        assert_eq!(
            ScriptCall::renderer_force_refresh().expr(),
            "mp.rendererForceRefresh();"
        );
    }

    #[test]
    fn renders_string_args_single_quoted() {
        assert_eq!(
            ScriptCall::sketch_set_channel("Clock", "channel0").expr(),
            "mp.sketchSetChannel('Clock','channel0');"
        );
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(
            ScriptCall::system_println(r"it's a \test").expr(),
            r"mp.systemPrintln('it\'s a \\test');"
        );
    }

    #[test]
    fn renders_mixed_arg_types() {
        assert_eq!(
            ScriptCall::sketch_alpha("Clock", 0.5).expr(),
            "mp.sketchAlpha('Clock',0.5);"
        );
        assert_eq!(
            ScriptCall::sketch_key_events_on("Clock", true).expr(),
            "mp.sketchKeyEventsOn('Clock',true);"
        );
        assert_eq!(
            ScriptCall::system_set_mouse(10, 20).expr(),
            "mp.systemSetMouse(10,20);"
        );
    }

    #[test]
    fn renders_group_varargs() {
        assert_eq!(
            ScriptCall::channel_create_group("both", &["a", "b"]).expr(),
            "mp.channelCreateGroup('both','a','b');"
        );
    }

    #[test]
    fn set_var_accepts_typed_values() {
        assert_eq!(
            ScriptCall::sketch_set_var("Clock", "label", "tick").expr(),
            "mp.sketchSetVar('Clock','label','tick');"
        );
        assert_eq!(
            ScriptCall::sketch_set_var("Clock", "speed", 2.0).expr(),
            "mp.sketchSetVar('Clock','speed',2);"
        );
    }
}
