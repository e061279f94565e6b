//! Property-based tests for configuration module
//!
//! Random valid configurations must validate and survive a TOML round trip.

use super::*;
use proptest::prelude::*;

prop_compose! {
    fn valid_window_config()(
        width in 1u32..8000,
        height in 1u32..8000,
        title in "[a-zA-Z0-9 _-]{0,32}",
        app_id in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}",
        min_ratio in 0.0f64..=1.0,
    ) -> WindowConfig {
        WindowConfig {
            width,
            height,
            title,
            app_id,
            min_width: (width as f64 * min_ratio) as u32,
            min_height: (height as f64 * min_ratio) as u32,
        }
    }
}

prop_compose! {
    fn valid_render_config()(
        backend in prop_oneof![
            Just("auto".to_string()),
            Just("vulkan".to_string()),
            Just("gl".to_string()),
        ],
        present_mode in prop_oneof![
            Just("auto".to_string()),
            Just("fifo".to_string()),
            Just("mailbox".to_string()),
            Just("immediate".to_string()),
        ],
        rgb in any::<[u8; 3]>(),
        alpha in proptest::option::of(any::<u8>()),
    ) -> RenderConfig {
        let mut clear_color = format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]);
        if let Some(a) = alpha {
            clear_color.push_str(&format!("{:02X}", a));
        }
        RenderConfig { backend, present_mode, clear_color }
    }
}

prop_compose! {
    fn valid_shell_config()(
        window in valid_window_config(),
        render in valid_render_config(),
        debug in any::<bool>(),
    ) -> ShellConfig {
        ShellConfig { window, render, general: GeneralConfig { debug } }
    }
}

proptest! {
    #[test]
    fn valid_configs_validate(config in valid_shell_config()) {
        prop_assert!(config.validate().is_ok());
        prop_assert!(config.session_options().is_ok());
    }

    #[test]
    fn toml_roundtrip_preserves_config(config in valid_shell_config()) {
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ShellConfig = toml::from_str(&text).unwrap();
        prop_assert_eq!(parsed, config);
    }

    #[test]
    fn zero_dimension_never_validates(mut config in valid_shell_config(), zero_width in any::<bool>()) {
        if zero_width {
            config.window.width = 0;
        } else {
            config.window.height = 0;
        }
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn merging_defaults_is_identity(config in valid_shell_config()) {
        let merged = config.clone().merge_partial(ShellConfig::default());
        prop_assert_eq!(merged, config);
    }
}
