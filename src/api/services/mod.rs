pub mod new_route;
pub mod redirect;

pub use new_route::{AddRouteRequest, NewRouteService, NewRouteSettings};
pub use redirect::{RedirectService, RedirectSettings, dynamic_routes, static_routes};
