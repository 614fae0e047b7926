use std::str::FromStr;

use zed_image::ImageSize;

use crate::error::ConfigError;

/// The capture resolution profiles of the stereo camera.
///
/// Each profile fixes the size of the side-by-side frame and the names of the calibration fields
/// to read (`LEFT_CAM_HD.fx`, `STEREO.RX_HD`, ...).
///
/// # Examples
///
/// ```
/// use zed_stereo::Resolution;
///
/// let resolution = Resolution::try_from(2).unwrap();
/// assert_eq!(resolution, Resolution::Hd);
/// assert_eq!(resolution.tag(), "HD");
/// assert_eq!(resolution.frame_size().width, 2560);
/// assert_eq!(resolution.eye_size().width, 1280);
/// assert_eq!("vga".parse::<Resolution>().unwrap(), Resolution::Vga);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Resolution {
    /// 4416x1242, selector 0.
    TwoK,
    /// 3840x1080, selector 1.
    #[default]
    Fhd,
    /// 2560x720, selector 2.
    Hd,
    /// 1344x376, selector 3.
    Vga,
}

impl Resolution {
    /// All profiles, ordered by selector.
    pub const ALL: [Resolution; 4] = [
        Resolution::TwoK,
        Resolution::Fhd,
        Resolution::Hd,
        Resolution::Vga,
    ];

    /// The numeric selector of the profile.
    pub fn selector(&self) -> u8 {
        match self {
            Resolution::TwoK => 0,
            Resolution::Fhd => 1,
            Resolution::Hd => 2,
            Resolution::Vga => 3,
        }
    }

    /// The tag used in calibration field names.
    pub fn tag(&self) -> &'static str {
        match self {
            Resolution::TwoK => "2K",
            Resolution::Fhd => "FHD",
            Resolution::Hd => "HD",
            Resolution::Vga => "VGA",
        }
    }

    /// The size of the full side-by-side frame.
    pub fn frame_size(&self) -> ImageSize {
        let (width, height) = match self {
            Resolution::TwoK => (4416, 1242),
            Resolution::Fhd => (3840, 1080),
            Resolution::Hd => (2560, 720),
            Resolution::Vga => (1344, 376),
        };
        ImageSize { width, height }
    }

    /// The size of one camera: half the frame width, the full frame height.
    pub fn eye_size(&self) -> ImageSize {
        let frame = self.frame_size();
        ImageSize {
            width: frame.width / 2,
            height: frame.height,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl TryFrom<i64> for Resolution {
    type Error = ConfigError;

    fn try_from(selector: i64) -> Result<Self, Self::Error> {
        Resolution::ALL
            .into_iter()
            .find(|r| i64::from(r.selector()) == selector)
            .ok_or_else(|| ConfigError::InvalidResolution(selector.to_string()))
    }
}

impl FromStr for Resolution {
    type Err = ConfigError;

    /// Parses either the numeric selector or the tag, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(selector) = s.parse::<i64>() {
            return Resolution::try_from(selector);
        }

        Resolution::ALL
            .into_iter()
            .find(|r| r.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidResolution(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_match_selectors() -> Result<(), ConfigError> {
        let expected = [
            (0, "2K", 4416, 1242),
            (1, "FHD", 3840, 1080),
            (2, "HD", 2560, 720),
            (3, "VGA", 1344, 376),
        ];
        for (selector, tag, width, height) in expected {
            let resolution = Resolution::try_from(selector)?;
            assert_eq!(resolution.tag(), tag);
            assert_eq!(i64::from(resolution.selector()), selector);
            assert_eq!(resolution.frame_size(), ImageSize { width, height });
            assert_eq!(
                resolution.eye_size(),
                ImageSize {
                    width: width / 2,
                    height
                }
            );
        }
        Ok(())
    }

    #[test]
    fn unknown_selector() {
        for selector in [-1, 4, 42] {
            assert!(matches!(
                Resolution::try_from(selector),
                Err(ConfigError::InvalidResolution(_))
            ));
        }
    }

    #[test]
    fn parse_tags_and_selectors() -> Result<(), ConfigError> {
        assert_eq!("2k".parse::<Resolution>()?, Resolution::TwoK);
        assert_eq!("Fhd".parse::<Resolution>()?, Resolution::Fhd);
        assert_eq!(" 2 ".parse::<Resolution>()?, Resolution::Hd);
        assert!("UHD".parse::<Resolution>().is_err());
        assert!("7".parse::<Resolution>().is_err());
        Ok(())
    }

    #[test]
    fn default_is_fhd() {
        assert_eq!(Resolution::default(), Resolution::Fhd);
        assert_eq!(Resolution::default().to_string(), "FHD");
    }
}
