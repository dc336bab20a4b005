//! Audio Bridge Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the audio stream bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Frames pulled from the engine per worker iteration. This bounds
    /// shutdown latency: `stop()` waits at most roughly one pull's
    /// duration for the worker to notice the flag.
    pub frames_per_pull: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            frames_per_pull: 512,
        }
    }
}

impl AudioConfig {
    /// Interleaved samples per pull (frames * channels)
    pub fn samples_per_pull(&self) -> usize {
        self.frames_per_pull as usize * self.channels as usize
    }

    /// Wall-clock duration of one pull's worth of audio
    pub fn pull_duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames_per_pull as f64 / self.sample_rate as f64)
    }

    /// Latency of one pull in milliseconds
    pub fn latency_ms(&self) -> f32 {
        (self.frames_per_pull as f32 / self.sample_rate as f32) * 1000.0
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate < 8000 || self.sample_rate > 192000 {
            return Err(format!("Invalid sample rate: {}", self.sample_rate));
        }
        if self.channels == 0 || self.channels > 8 {
            return Err(format!("Invalid channel count: {}", self.channels));
        }
        if self.frames_per_pull < 32 || self.frames_per_pull > 8192 {
            return Err(format!("Invalid frames per pull: {}", self.frames_per_pull));
        }
        Ok(())
    }

    /// Config optimized for low latency
    pub fn low_latency() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            frames_per_pull: 128, // ~2.6ms per pull
        }
    }

    /// Config optimized for stability
    pub fn stable() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            frames_per_pull: 1024, // ~21ms per pull
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.samples_per_pull(), 1024);
    }

    #[test]
    fn test_pull_duration() {
        let config = AudioConfig {
            sample_rate: 48000,
            channels: 2,
            frames_per_pull: 480, // exactly 10ms at 48kHz
        };
        assert!((config.latency_ms() - 10.0).abs() < 0.01);
        assert_eq!(config.pull_duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_validation() {
        assert!(AudioConfig::default().validate().is_ok());

        let invalid_rate = AudioConfig {
            sample_rate: 100,
            ..Default::default()
        };
        assert!(invalid_rate.validate().is_err());

        let invalid_channels = AudioConfig {
            channels: 0,
            ..Default::default()
        };
        assert!(invalid_channels.validate().is_err());

        let invalid_frames = AudioConfig {
            frames_per_pull: 10,
            ..Default::default()
        };
        assert!(invalid_frames.validate().is_err());
    }

    #[test]
    fn test_preset_configs() {
        let low_latency = AudioConfig::low_latency();
        let stable = AudioConfig::stable();
        assert!(low_latency.latency_ms() < stable.latency_ms());
        assert!(low_latency.validate().is_ok());
        assert!(stable.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AudioConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AudioConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.sample_rate, back.sample_rate);
        assert_eq!(config.frames_per_pull, back.frames_per_pull);
    }
}
