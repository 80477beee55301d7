pub mod answers;
pub mod bbox;
pub mod intent;
pub mod keywords;
pub mod location;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod rank;

pub use bbox::{BoundingBox, GeoError, MAX_SPAN_DEG};
pub use intent::{
    Action, BuildingAttributes, CameraSettings, Intent, Pitch, PitchChange, QuestionContext,
    SortBy, TimePreset, TimeSettings, WeatherKind, WeatherSettings,
};
pub use keywords::parse_keywords;
pub use location::{zoom_for_location_type, ResolvedLocation};
pub use metrics::{area_m2, centroid, estimated_height_m, parse_height};
pub use models::{BuildingFeature, FeatureKind, Geometry, RouteResponse, SearchRequest, TagMap};
pub use normalize::{normalize, normalize_all, LatLon, RawElement, RawMember};
pub use rank::{rank, RankedResult};
