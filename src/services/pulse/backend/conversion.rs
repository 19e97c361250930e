use libpulse_binding::{
    context::introspect::SinkInfo,
    volume::{ChannelVolumes, Volume},
};

use crate::services::pulse::SinkSnapshot;

/// Channel count of every volume structure sent to the server
pub const APPLIED_CHANNELS: u8 = 2;

/// Average raw channel volumes into a percent of normal volume
///
/// Plain arithmetic mean, not weighted and not the loudest channel:
/// - `[NORMAL, NORMAL]` → 100.0
/// - `[NORMAL, MUTED]` → 50.0
/// - values above `NORMAL` give results above 100 and are kept
pub fn average_percent(raw: &[u32]) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    let sum: f64 = raw.iter().map(|&v| f64::from(v)).sum();
    let avg = sum / raw.len() as f64;

    avg / f64::from(Volume::NORMAL.0) * 100.0
}

/// Convert a percent of normal volume into PulseAudio's linear unit
///
/// Maps 0.0 → `Volume::MUTED`, 100.0 → `Volume::NORMAL`, and clamps anything
/// past `Volume::MAX`. Callers reject negative and non-finite input first.
pub fn percent_to_volume(percent: f64) -> Volume {
    let raw = percent / 100.0 * f64::from(Volume::NORMAL.0);
    Volume(raw.clamp(0.0, f64::from(Volume::MAX.0)) as u32)
}

/// Build the uniform two-channel structure used for every volume change
///
/// Sinks with a different channel count receive the server's own broadcast
/// of these two values.
pub fn stereo_volumes(percent: f64) -> ChannelVolumes {
    let mut volumes = ChannelVolumes::default();
    volumes.set(APPLIED_CHANNELS, percent_to_volume(percent));
    volumes
}

/// Snapshot a sink reported by introspection
pub fn snapshot_from_sink(sink_info: &SinkInfo) -> SinkSnapshot {
    let raw: Vec<u32> = sink_info.volume.get().iter().map(|v| v.0).collect();

    SinkSnapshot {
        name: sink_info
            .name
            .as_ref()
            .map(|name| name.to_string())
            .unwrap_or_default(),
        volume: average_percent(&raw),
        muted: sink_info.mute,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const NORMAL: u32 = Volume::NORMAL.0;

    #[test]
    fn average_of_equal_channels_is_that_channel() {
        assert_eq!(average_percent(&[NORMAL, NORMAL]), 100.0);
        assert_eq!(average_percent(&[NORMAL / 2]), 50.0);
    }

    #[test]
    fn average_is_arithmetic_mean_not_max() {
        assert_eq!(average_percent(&[NORMAL, 0]), 50.0);
        assert_eq!(average_percent(&[NORMAL, 0, 0, NORMAL]), 50.0);
    }

    #[test]
    fn boosted_volume_is_preserved() {
        let boosted = average_percent(&[NORMAL + NORMAL / 2, NORMAL + NORMAL / 2]);
        assert_eq!(boosted, 150.0);
    }

    #[test]
    fn no_channels_reads_as_zero() {
        assert_eq!(average_percent(&[]), 0.0);
    }

    #[test]
    fn percent_maps_onto_reference_points() {
        assert_eq!(percent_to_volume(0.0), Volume::MUTED);
        assert_eq!(percent_to_volume(100.0), Volume::NORMAL);
        assert_eq!(percent_to_volume(50.0).0, NORMAL / 2);
    }

    #[test]
    fn percent_beyond_max_is_clamped() {
        assert_eq!(percent_to_volume(1.0e9), Volume::MAX);
    }

    #[test]
    fn percent_survives_conversion_within_one_raw_step() {
        let step = 100.0 / f64::from(NORMAL);
        for percent in [0.0, 1.0, 12.5, 33.3, 66.6, 99.9, 100.0] {
            let raw = percent_to_volume(percent).0;
            let back = average_percent(&[raw, raw]);
            assert!(
                (back - percent).abs() <= step,
                "{percent} came back as {back}"
            );
        }
    }

    #[test]
    fn stereo_structure_always_has_two_channels() {
        let volumes = stereo_volumes(40.0);
        assert_eq!(volumes.len(), APPLIED_CHANNELS);
        assert!(volumes.get().iter().all(|v| *v == percent_to_volume(40.0)));
    }
}
