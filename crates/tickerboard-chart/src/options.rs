use crate::palette::Rgba;
use serde::Serialize;

pub const ANIMATION_DURATION_MS: u32 = 1000;
pub const ANIMATION_POINT_DELAY_MS: u32 = 10;
pub const LINE_TENSION: f64 = 0.1;

/// Light or dark presentation; has no bearing on the data.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Titles, ticks and legend text.
    pub fn text(self) -> Rgba {
        match self {
            Theme::Light => Rgba::BLACK,
            Theme::Dark => Rgba::WHITE,
        }
    }

    pub fn grid(self) -> Rgba {
        self.text().with_alpha(0.1)
    }

    pub fn canvas(self) -> Rgba {
        match self {
            Theme::Light => Rgba::WHITE,
            Theme::Dark => Rgba::opaque(0x1e, 0x1e, 0x1e),
        }
    }

    pub fn tooltip_background(self) -> Rgba {
        match self {
            Theme::Light => Rgba::WHITE.with_alpha(0.7),
            Theme::Dark => Rgba::BLACK.with_alpha(0.7),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "Light Mode"),
            Theme::Dark => write!(f, "Dark Mode"),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Renderer configuration, passed through untouched
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub animation: Animation,
    pub scales: Scales,
    pub plugins: Plugins,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub duration: u32,
    pub easing: &'static str,
    /// Stagger between consecutive points as they draw in.
    pub point_delay: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scales {
    pub x: Scale,
    pub y: Scale,
    pub y1: Scale,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'static str>,
    pub title: ScaleTitle,
    pub ticks: Ticks,
    pub grid: Grid,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScaleTitle {
    pub display: bool,
    pub text: &'static str,
    pub color: Rgba,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Ticks {
    pub color: Rgba,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub draw_on_chart_area: bool,
    pub color: Rgba,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Plugins {
    pub legend: Legend,
    pub tooltip: Tooltip,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Legend {
    pub labels: Ticks,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub background_color: Rgba,
    pub title_color: Rgba,
    pub body_color: Rgba,
}

impl ChartOptions {
    pub fn for_theme(theme: Theme) -> Self {
        let text = theme.text();
        let grid = theme.grid();
        let scale = |kind, position, title, on_chart_area| Scale {
            kind,
            display: true,
            position,
            title: ScaleTitle {
                display: true,
                text: title,
                color: text,
            },
            ticks: Ticks { color: text },
            grid: Grid {
                draw_on_chart_area: on_chart_area,
                color: grid,
            },
        };

        Self {
            responsive: true,
            animation: Animation {
                duration: ANIMATION_DURATION_MS,
                easing: "easeInOutQuad",
                point_delay: ANIMATION_POINT_DELAY_MS,
            },
            scales: Scales {
                x: scale(None, None, "Date", true),
                y: scale(Some("linear"), Some("left"), "Price ($)", true),
                // volume gridlines would fight the price ones
                y1: scale(Some("linear"), Some("right"), "Volume", false),
            },
            plugins: Plugins {
                legend: Legend {
                    labels: Ticks { color: text },
                },
                tooltip: Tooltip {
                    background_color: theme.tooltip_background(),
                    title_color: text,
                    body_color: text,
                },
            },
        }
    }
}
