#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Unit tag for container-relative pixel coordinates shared by the graph canvas and the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenSpace;

pub type Point = euclid::Point2D<f64, ScreenSpace>;
pub type Vector = euclid::Vector2D<f64, ScreenSpace>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

/// A validated geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, alt: None }
    }

    /// Accepts anything a position getter may hand back; `None` for non-finite components.
    pub fn from_like(like: LatLngLike) -> Option<Self> {
        let (lat, lng, alt) = match like {
            LatLngLike::Pair([lat, lng]) => (lat, lng, None),
            LatLngLike::Triple([lat, lng, alt]) => (lat, lng, Some(alt)),
            LatLngLike::Object { lat, lng, alt } => (lat, lng, alt),
        };
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some(Self {
            lat,
            lng,
            alt: alt.filter(|a| a.is_finite()),
        })
    }

    /// Reads a coordinate out of loosely-typed node data (`[lat, lng]` or `{lat, lng}`).
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let like = LatLngLike::deserialize(value).ok()?;
        Self::from_like(like)
    }
}

impl From<LatLng> for LatLngLike {
    fn from(value: LatLng) -> Self {
        Self::Object {
            lat: value.lat,
            lng: value.lng,
            alt: value.alt,
        }
    }
}

/// Loose input shape for geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LatLngLike {
    Pair([f64; 2]),
    Triple([f64; 3]),
    Object {
        lat: f64,
        #[serde(alias = "lon")]
        lng: f64,
        #[serde(default)]
        alt: Option<f64>,
    },
}

/// Axis-aligned lat/lng accumulator. Starts empty (and invalid).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    south_west: Option<LatLng>,
    north_east: Option<LatLng>,
}

impl LatLngBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, latlng: LatLng) {
        match (&mut self.south_west, &mut self.north_east) {
            (Some(sw), Some(ne)) => {
                sw.lat = sw.lat.min(latlng.lat);
                sw.lng = sw.lng.min(latlng.lng);
                ne.lat = ne.lat.max(latlng.lat);
                ne.lng = ne.lng.max(latlng.lng);
            }
            _ => {
                let corner = LatLng::new(latlng.lat, latlng.lng);
                self.south_west = Some(corner);
                self.north_east = Some(corner);
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.south_west.is_some() && self.north_east.is_some()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.south_west
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.north_east
    }

    pub fn center(&self) -> Option<LatLng> {
        let (sw, ne) = (self.south_west?, self.north_east?);
        Some(LatLng::new(
            (sw.lat + ne.lat) / 2.0,
            (sw.lng + ne.lng) / 2.0,
        ))
    }
}

impl FromIterator<LatLng> for LatLngBounds {
    fn from_iter<T: IntoIterator<Item = LatLng>>(iter: T) -> Self {
        let mut bounds = Self::new();
        for latlng in iter {
            bounds.extend(latlng);
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    EaseInCubic,
    EaseOutCubic,
}

impl Easing {
    /// Maps linear progress `t` (clamped to `0..=1`) onto the curve.
    pub fn sample(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}
