//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to depth changes, fullscreen and exit. Key repeats
//! arrive as presses and map the same way, so holding Up steps the depth.

use sierpinski_core::DepthCommand;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// One level deeper (Up, numpad +, =)
    IncreaseDepth,
    /// One level shallower (Down, numpad -, -)
    DecreaseDepth,
    /// Back to the initial depth (R key)
    ResetDepth,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Exit application (Escape)
    Exit,
}

impl InputAction {
    /// The depth transition this action requests, if any
    pub fn depth_command(self) -> Option<DepthCommand> {
        match self {
            InputAction::IncreaseDepth => Some(DepthCommand::Increase),
            InputAction::DecreaseDepth => Some(DepthCommand::Decrease),
            InputAction::ResetDepth => Some(DepthCommand::Reset),
            InputAction::ToggleFullscreen | InputAction::Exit => None,
        }
    }
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for bound keys, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::ArrowUp | KeyCode::NumpadAdd | KeyCode::Equal => Some(InputAction::IncreaseDepth),
            KeyCode::ArrowDown | KeyCode::NumpadSubtract | KeyCode::Minus => {
                Some(InputAction::DecreaseDepth)
            }
            KeyCode::KeyR => Some(InputAction::ResetDepth),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_keys() {
        for key in [KeyCode::ArrowUp, KeyCode::NumpadAdd, KeyCode::Equal] {
            assert_eq!(
                InputMapper::map_keyboard(key, ElementState::Pressed),
                Some(InputAction::IncreaseDepth),
                "Key {:?}",
                key
            );
        }
    }

    #[test]
    fn test_decrease_keys() {
        for key in [KeyCode::ArrowDown, KeyCode::NumpadSubtract, KeyCode::Minus] {
            assert_eq!(
                InputMapper::map_keyboard(key, ElementState::Pressed),
                Some(InputAction::DecreaseDepth),
                "Key {:?}",
                key
            );
        }
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyR, ElementState::Pressed),
            Some(InputAction::ResetDepth)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed),
            Some(InputAction::ToggleFullscreen)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed),
            Some(InputAction::Exit)
        );
    }

    #[test]
    fn test_key_release_ignored() {
        for key in [KeyCode::ArrowUp, KeyCode::KeyR, KeyCode::Escape] {
            assert_eq!(InputMapper::map_keyboard(key, ElementState::Released), None);
        }
    }

    #[test]
    fn test_unbound_keys_not_mapped() {
        for key in [KeyCode::KeyW, KeyCode::KeyA, KeyCode::Space, KeyCode::ArrowLeft] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_depth_commands() {
        assert_eq!(InputAction::IncreaseDepth.depth_command(), Some(DepthCommand::Increase));
        assert_eq!(InputAction::DecreaseDepth.depth_command(), Some(DepthCommand::Decrease));
        assert_eq!(InputAction::ResetDepth.depth_command(), Some(DepthCommand::Reset));
        assert_eq!(InputAction::Exit.depth_command(), None);
        assert_eq!(InputAction::ToggleFullscreen.depth_command(), None);
    }
}
