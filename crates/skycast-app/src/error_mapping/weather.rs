use skycast_core::{AppError, NetworkError, ReqwestErrorExt, WeatherError};
use skycast_weather::WeatherError as GatewayError;

pub(super) fn to_app_error(e: GatewayError) -> AppError {
    if e.is_timeout() {
        return AppError::Network(NetworkError::Timeout);
    }

    match e {
        GatewayError::Network(e) => AppError::Network(e.into_network_error()),
        GatewayError::Parse(msg) => AppError::Weather(WeatherError::InvalidData(msg)),
        GatewayError::Location(e) => {
            AppError::Weather(WeatherError::LocationUnavailable(e.to_string()))
        }
    }
}
