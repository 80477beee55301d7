//! Scene controls. These only echo settings back to the client.

use skyline_core::{
    Action, CameraSettings, Intent, Pitch, RouteResponse, TimePreset, WeatherKind,
};

pub(super) fn set_weather(intent: Intent) -> RouteResponse {
    let settings = intent.weather_settings.clone().unwrap_or_default();
    let answer = match settings.kind {
        WeatherKind::Rain => "Making it rain...",
        WeatherKind::Snow => "Adding snow effect...",
        WeatherKind::Clear => "Clearing the weather...",
    };
    RouteResponse {
        weather_settings: Some(settings),
        ..RouteResponse::message(intent, Action::SetWeather, answer)
    }
}

pub(super) fn set_time(intent: Intent) -> RouteResponse {
    let settings = intent.time_settings.clone().unwrap_or_default();
    let answer = match settings.preset {
        TimePreset::Night => "Switching to night mode...",
        TimePreset::Day => "Switching to day mode...",
    };
    RouteResponse {
        time_settings: Some(settings),
        ..RouteResponse::message(intent, Action::SetTime, answer)
    }
}

pub(super) fn camera_control(intent: Intent) -> RouteResponse {
    let settings = intent.camera_settings.clone().unwrap_or_default();
    let answer = camera_answer(&settings);
    RouteResponse {
        camera_settings: Some(settings),
        ..RouteResponse::message(intent, Action::CameraControl, answer)
    }
}

fn camera_answer(settings: &CameraSettings) -> &'static str {
    let nonzero = |value: Option<f64>| value.filter(|v| *v != 0.0);

    if let Some(delta) = nonzero(settings.zoom_delta) {
        return if delta > 0.0 { "Zooming in..." } else { "Zooming out..." };
    }
    match settings.pitch {
        Some(Pitch::Degrees(pitch)) if pitch == 0.0 => return "Switching to bird's eye view...",
        Some(_) => return "Adjusting camera tilt...",
        None => {}
    }
    if nonzero(settings.bearing_delta).is_some() {
        return "Rotating the view...";
    }
    "Adjusting camera..."
}
