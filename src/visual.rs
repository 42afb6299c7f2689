use std::fmt;
use std::rc::Weak;

use palette::{Hsl, IntoColor, Srgb};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Named colors
// ---------------------------------------------------------------------------

pub const GREY: &str = "#B2B2B2";
pub const BLUE: &str = "#1F7884";
pub const GREEN: &str = "#33A02C";
pub const RED: &str = "#E31A1C";
pub const ORANGE: &str = "#FF7F00";
pub const PURPLE: &str = "#6A3D9A";
pub const LIGHT_BLUE: &str = "#A6CEE3";
pub const LIGHT_GREEN: &str = "#B2DF8A";
pub const LIGHT_RED: &str = "#FB9A99";
pub const LIGHT_ORANGE: &str = "#FDBF6F";
pub const LIGHT_PURPLE: &str = "#CAB2D6";

/// Generate `n` visually distinct hex colors using evenly spaced hues, for
/// assigning styles to freshly extracted records.
pub fn distinct_colors(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            format!(
                "#{:02x}{:02x}{:02x}",
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Line styles
// ---------------------------------------------------------------------------

/// The fixed set of acceptable line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    None,
}

impl LineStyle {
    pub const ALL: [LineStyle; 5] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::Dotted,
        LineStyle::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::DashDot => "dash-dot",
            LineStyle::Dotted => "dotted",
            LineStyle::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<LineStyle> {
        Self::ALL.into_iter().find(|style| style.as_str() == s)
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Why a line width was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineWidthProblem {
    NotNumeric,
    Negative,
}

impl fmt::Display for LineWidthProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWidthProblem::NotNumeric => write!(f, "not a number"),
            LineWidthProblem::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VisualError {
    #[error("line style should be one of solid/dashed/dash-dot/dotted/none, got '{value}'")]
    InvalidLineStyle { value: String },

    #[error("line width should be a non-negative number, got '{value}' ({problem})")]
    InvalidLineWidth {
        value: String,
        problem: LineWidthProblem,
    },

    #[error("visual attribute '{name}' does not exist")]
    UnknownAttribute { name: String },

    #[error("visual attribute '{name}' cannot hold '{value}'")]
    InvalidValue { name: String, value: String },
}

// ---------------------------------------------------------------------------
// VisualAttributes – a closed-schema, observed style record
// ---------------------------------------------------------------------------

/// The notification capability a parent exposes to hear about style changes.
pub trait ChangeSink {
    fn on_changed(&self, attrs: &VisualAttributes);
}

/// A value handed to [`VisualAttributes::set_field`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Float(f64),
    Int(i64),
}

impl AttributeValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Int(i) => Some(*i as f64),
            AttributeValue::Str(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Str(s) => write!(f, "{s}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Str(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Str(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Int(i)
    }
}

/// Visual styling for one plotted record. The field set is closed: writes go
/// through [`set_field`](Self::set_field), which validates and then notifies
/// the parent sink, if one is attached and still alive.
///
/// The parent back-reference is non-owning (`Weak`); dropping the parent
/// silently disables notification. Reentrant writes from inside a sink's
/// `on_changed` are not guarded against and must be avoided by callers.
#[derive(Clone)]
pub struct VisualAttributes {
    color: String,
    alpha: f64,
    linewidth: f64,
    linestyle: LineStyle,
    marker: String,
    markersize: f64,
    label: Option<String>,
    parent: Option<Weak<dyn ChangeSink>>,
}

impl Default for VisualAttributes {
    fn default() -> Self {
        VisualAttributes {
            color: GREY.to_string(),
            alpha: 1.0,
            linewidth: 1.0,
            linestyle: LineStyle::Solid,
            marker: "o".to_string(),
            markersize: 40.0,
            label: None,
            parent: None,
        }
    }
}

impl fmt::Debug for VisualAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualAttributes")
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .field("linewidth", &self.linewidth)
            .field("linestyle", &self.linestyle)
            .field("marker", &self.marker)
            .field("markersize", &self.markersize)
            .field("label", &self.label)
            .field("parent", &self.parent.is_some())
            .finish()
    }
}

impl VisualAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record that notifies `parent` on every successful write.
    pub fn with_parent(parent: Weak<dyn ChangeSink>) -> Self {
        VisualAttributes {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn linewidth(&self) -> f64 {
        self.linewidth
    }

    pub fn linestyle(&self) -> LineStyle {
        self.linestyle
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn markersize(&self) -> f64 {
        self.markersize
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Attach a parent sink and notify it once.
    pub fn set_parent(&mut self, parent: Weak<dyn ChangeSink>) {
        self.parent = Some(parent);
        self.broadcast();
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    /// Validated write entry point. On success the value is stored and the
    /// parent sink (when attached and alive) hears about it exactly once; on
    /// failure the prior value is untouched and nothing is broadcast.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<(), VisualError> {
        let value = value.into();
        match name {
            "linestyle" => {
                let style = match &value {
                    AttributeValue::Str(s) => LineStyle::parse(s),
                    _ => None,
                };
                let style = style.ok_or_else(|| VisualError::InvalidLineStyle {
                    value: value.to_string(),
                })?;
                self.linestyle = style;
            }
            "linewidth" => {
                let width = value.as_f64().ok_or_else(|| VisualError::InvalidLineWidth {
                    value: value.to_string(),
                    problem: LineWidthProblem::NotNumeric,
                })?;
                if width < 0.0 {
                    return Err(VisualError::InvalidLineWidth {
                        value: value.to_string(),
                        problem: LineWidthProblem::Negative,
                    });
                }
                self.linewidth = width;
            }
            "color" => self.color = self.expect_str(name, value)?,
            "marker" => self.marker = self.expect_str(name, value)?,
            "label" => self.label = Some(self.expect_str(name, value)?),
            "alpha" => self.alpha = self.expect_f64(name, value)?,
            "markersize" => self.markersize = self.expect_f64(name, value)?,
            _ => {
                return Err(VisualError::UnknownAttribute {
                    name: name.to_string(),
                })
            }
        }
        self.broadcast();
        Ok(())
    }

    /// Copy the style fields (not the label, not the parent) from `other`
    /// through the validated entry point.
    pub fn copy_from(&mut self, other: &VisualAttributes) -> Result<(), VisualError> {
        self.set_field("color", other.color.as_str())?;
        self.set_field("alpha", other.alpha)?;
        self.set_field("linewidth", other.linewidth)?;
        self.set_field("linestyle", other.linestyle.as_str())?;
        self.set_field("marker", other.marker.as_str())?;
        self.set_field("markersize", other.markersize)?;
        Ok(())
    }

    fn expect_str(&self, name: &str, value: AttributeValue) -> Result<String, VisualError> {
        match value {
            AttributeValue::Str(s) => Ok(s),
            other => Err(VisualError::InvalidValue {
                name: name.to_string(),
                value: other.to_string(),
            }),
        }
    }

    fn expect_f64(&self, name: &str, value: AttributeValue) -> Result<f64, VisualError> {
        value.as_f64().ok_or_else(|| VisualError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn broadcast(&self) {
        if let Some(sink) = self.parent.as_ref().and_then(Weak::upgrade) {
            sink.on_changed(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingSink {
        hits: Cell<usize>,
        last_style: Cell<Option<LineStyle>>,
    }

    impl ChangeSink for CountingSink {
        fn on_changed(&self, attrs: &VisualAttributes) {
            self.hits.set(self.hits.get() + 1);
            self.last_style.set(Some(attrs.linestyle()));
        }
    }

    fn attached() -> (Rc<CountingSink>, VisualAttributes) {
        let sink = Rc::new(CountingSink::default());
        let mut attrs = VisualAttributes::new();
        let sink_dyn: Rc<dyn ChangeSink> = sink.clone();
        attrs.set_parent(Rc::downgrade(&sink_dyn));
        sink.hits.set(0); // attaching itself notifies once
        (sink, attrs)
    }

    #[test]
    fn valid_linestyle_broadcasts_once() {
        let (sink, mut attrs) = attached();
        attrs.set_field("linestyle", "dotted").unwrap();
        assert_eq!(attrs.linestyle(), LineStyle::Dotted);
        assert_eq!(sink.hits.get(), 1);
        assert_eq!(sink.last_style.get(), Some(LineStyle::Dotted));
    }

    #[test]
    fn invalid_linestyle_changes_nothing_and_stays_silent() {
        let (sink, mut attrs) = attached();
        let err = attrs.set_field("linestyle", "bold").unwrap_err();
        assert!(matches!(err, VisualError::InvalidLineStyle { ref value } if value == "bold"));
        assert_eq!(attrs.linestyle(), LineStyle::Solid);
        assert_eq!(sink.hits.get(), 0);
    }

    #[test]
    fn linewidth_rejections_are_distinguishable() {
        let mut attrs = VisualAttributes::new();

        let err = attrs.set_field("linewidth", "wide").unwrap_err();
        assert!(matches!(
            err,
            VisualError::InvalidLineWidth {
                problem: LineWidthProblem::NotNumeric,
                ..
            }
        ));

        let err = attrs.set_field("linewidth", -2.0).unwrap_err();
        assert!(matches!(
            err,
            VisualError::InvalidLineWidth {
                problem: LineWidthProblem::Negative,
                ..
            }
        ));

        assert_eq!(attrs.linewidth(), 1.0);
        attrs.set_field("linewidth", 3i64).unwrap();
        assert_eq!(attrs.linewidth(), 3.0);
    }

    #[test]
    fn schema_is_closed() {
        let mut attrs = VisualAttributes::new();
        let err = attrs.set_field("zorder", 5i64).unwrap_err();
        assert!(matches!(err, VisualError::UnknownAttribute { ref name } if name == "zorder"));
    }

    #[test]
    fn typed_fields_reject_mismatched_values() {
        let mut attrs = VisualAttributes::new();
        let err = attrs.set_field("alpha", "opaque").unwrap_err();
        assert!(matches!(err, VisualError::InvalidValue { ref name, .. } if name == "alpha"));
        assert_eq!(attrs.alpha(), 1.0);
    }

    #[test]
    fn copy_from_takes_style_but_not_label_or_parent() {
        let (sink, mut target) = attached();

        let mut source = VisualAttributes::new();
        source.set_field("color", RED).unwrap();
        source.set_field("alpha", 0.5).unwrap();
        source.set_field("linewidth", 2.5).unwrap();
        source.set_field("linestyle", "dashed").unwrap();
        source.set_field("marker", "s").unwrap();
        source.set_field("markersize", 12.0).unwrap();
        source.set_field("label", "theirs").unwrap();

        target.set_field("label", "mine").unwrap();
        sink.hits.set(0);

        target.copy_from(&source).unwrap();
        assert_eq!(target.color(), RED);
        assert_eq!(target.alpha(), 0.5);
        assert_eq!(target.linewidth(), 2.5);
        assert_eq!(target.linestyle(), LineStyle::Dashed);
        assert_eq!(target.marker(), "s");
        assert_eq!(target.markersize(), 12.0);
        assert_eq!(target.label(), Some("mine"));
        // one notification per copied field
        assert_eq!(sink.hits.get(), 6);
    }

    #[test]
    fn dropped_parent_disables_notification() {
        let (sink, mut attrs) = attached();
        drop(sink);
        attrs.set_field("linestyle", "none").unwrap();
        assert_eq!(attrs.linestyle(), LineStyle::None);
    }

    #[test]
    fn distinct_colors_are_distinct_hex() {
        let colors = distinct_colors(6);
        assert_eq!(colors.len(), 6);
        for c in &colors {
            assert!(c.starts_with('#') && c.len() == 7);
        }
        let unique: std::collections::HashSet<_> = colors.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn distinct_colors_of_zero_is_empty() {
        assert!(distinct_colors(0).is_empty());
    }
}
