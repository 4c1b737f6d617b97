use argh::FromArgs;

use lipsync_track::Easing;

/// lipsync: phoneme sequences to facial keyframe tracks
#[derive(Debug, FromArgs)]
pub struct Args {
    /// enable debug logging
    #[argh(switch, short = 'v', long = "verbose")]
    pub verbose: bool,
    #[argh(subcommand)]
    pub command: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Generate(GenerateCommand),
    Sample(SampleCommand),
}

/// Generate a keyframe track from a request file
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "generate")]
pub struct GenerateCommand {
    /// path to the request JSON
    #[argh(option, short = 'i')]
    pub input: String,
    /// where to write the track, stdout when omitted
    #[argh(option, short = 'o')]
    pub output: Option<String>,
    /// skip the smoothing passes
    #[argh(switch)]
    pub no_smoothing: bool,
    /// intermediate frames inserted between distant keyframes
    #[argh(option)]
    pub frames: Option<usize>,
}

/// Sample a track at a playback time
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "sample")]
pub struct SampleCommand {
    /// path to a generated track JSON
    #[argh(option, short = 't')]
    pub track: String,
    /// playback time in seconds
    #[argh(option)]
    pub time: f64,
    /// easing between keyframes: linear, smoothstep or ease-out-cubic
    #[argh(option, default = "Easing::Linear")]
    pub easing: Easing,
}
