//! Sprite-sheet animation playback
//!
//! The player sheet has nine frames: 0-3 walk left, 4 facing the camera,
//! 5-8 walk right. Playback is tick-driven so it stays deterministic.

use serde::{Deserialize, Serialize};

/// Named animations for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimKey {
    Left,
    Turn,
    Right,
}

/// What happens after the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repeat {
    /// Hold the last frame
    Once,
    /// Loop forever
    Forever,
}

/// A frame sequence played at a fixed rate
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frames: Vec<u32>,
    /// Frames per second
    pub frame_rate: f32,
    pub repeat: Repeat,
}

impl Animation {
    /// Definition for one of the player animations
    pub fn player(key: AnimKey) -> Self {
        match key {
            AnimKey::Left => Self {
                frames: (0..=3).collect(),
                frame_rate: 10.0,
                repeat: Repeat::Forever,
            },
            AnimKey::Turn => Self {
                frames: vec![4],
                frame_rate: 20.0,
                repeat: Repeat::Once,
            },
            AnimKey::Right => Self {
                frames: (5..=8).collect(),
                frame_rate: 10.0,
                repeat: Repeat::Forever,
            },
        }
    }

    /// Seconds each frame stays on screen
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

/// Playback cursor for the player sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimPlayer {
    pub current: AnimKey,
    /// Index into the current animation's frame list
    pub frame_cursor: usize,
    /// Time spent on the current frame (seconds)
    pub elapsed: f32,
}

impl Default for AnimPlayer {
    fn default() -> Self {
        Self {
            current: AnimKey::Turn,
            frame_cursor: 0,
            elapsed: 0.0,
        }
    }
}

impl AnimPlayer {
    /// Start an animation. With `ignore_if_playing`, asking for the
    /// animation that is already running keeps its cursor.
    pub fn play(&mut self, key: AnimKey, ignore_if_playing: bool) {
        if ignore_if_playing && self.current == key {
            return;
        }
        self.current = key;
        self.frame_cursor = 0;
        self.elapsed = 0.0;
    }

    /// Advance playback by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let anim = Animation::player(self.current);
        let frame_time = anim.frame_duration();
        let len = anim.frames.len();

        self.elapsed += dt;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            match anim.repeat {
                Repeat::Forever => self.frame_cursor = (self.frame_cursor + 1) % len,
                Repeat::Once => self.frame_cursor = (self.frame_cursor + 1).min(len - 1),
            }
        }
    }

    /// Current sprite-sheet frame
    pub fn frame(&self) -> u32 {
        let anim = Animation::player(self.current);
        anim.frames[self.frame_cursor.min(anim.frames.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_definitions() {
        assert_eq!(Animation::player(AnimKey::Left).frames, vec![0, 1, 2, 3]);
        assert_eq!(Animation::player(AnimKey::Turn).frames, vec![4]);
        assert_eq!(Animation::player(AnimKey::Right).frames, vec![5, 6, 7, 8]);
        assert_eq!(Animation::player(AnimKey::Turn).frame_rate, 20.0);
    }

    #[test]
    fn test_walk_loops() {
        let mut anim = AnimPlayer::default();
        anim.play(AnimKey::Right, true);
        assert_eq!(anim.frame(), 5);

        // 10 fps: four frames take 0.4s, then wrap
        for _ in 0..4 {
            anim.advance(0.1001);
        }
        assert_eq!(anim.frame(), 5);
        anim.advance(0.1001);
        assert_eq!(anim.frame(), 6);
    }

    #[test]
    fn test_ignore_if_playing_keeps_cursor() {
        let mut anim = AnimPlayer::default();
        anim.play(AnimKey::Left, true);
        anim.advance(0.25);
        let frame = anim.frame();
        assert_ne!(frame, 0);

        anim.play(AnimKey::Left, true);
        assert_eq!(anim.frame(), frame);

        anim.play(AnimKey::Left, false);
        assert_eq!(anim.frame(), 0);
    }

    #[test]
    fn test_turn_holds_single_frame() {
        let mut anim = AnimPlayer::default();
        anim.play(AnimKey::Turn, false);
        anim.advance(1.0);
        assert_eq!(anim.frame(), 4);
    }
}
