//! The application's page table.
//!
//! History-mode navigation: each entry is a real URL path, matched
//! case-insensitively with an optional trailing slash. Query strings and
//! fragments never take part in matching.

use std::fmt;

/// Page views the shell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Orders,
    Materials,
    Optimization,
    Schedule,
    Analytics,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

pub const ROUTES: [Route; 6] = [
    Route { path: "/", name: "Dashboard", view: View::Dashboard },
    Route { path: "/orders", name: "Orders", view: View::Orders },
    Route { path: "/materials", name: "Materials", view: View::Materials },
    Route { path: "/optimization", name: "Optimization", view: View::Optimization },
    Route { path: "/schedule", name: "Schedule", view: View::Schedule },
    Route { path: "/analytics", name: "Analytics", view: View::Analytics },
];

/// Finds the route for a location such as `/Orders/?page=2#top`.
pub fn resolve(location: &str) -> Option<&'static Route> {
    let path = normalize(location);
    ROUTES.iter().find(|r| r.path.eq_ignore_ascii_case(path))
}

pub fn resolve_view(location: &str) -> Option<View> {
    resolve(location).map(|r| r.view)
}

/// Route for a view. Every view has exactly one path.
pub fn path_for(view: View) -> &'static str {
    ROUTES
        .iter()
        .find(|r| r.view == view)
        .map(|r| r.path)
        .unwrap_or("/")
}

fn normalize(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let path = &location[..end];
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        Some(_) => "/",
        None if path.is_empty() => "/",
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_resolves_to_schedule_only() {
        let matches: Vec<&Route> = ROUTES
            .iter()
            .filter(|r| resolve("/schedule").is_some_and(|hit| hit == *r))
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].view, View::Schedule);
        assert_eq!(resolve_view("/schedule"), Some(View::Schedule));
    }

    #[test]
    fn every_path_maps_one_to_one() {
        for route in &ROUTES {
            assert_eq!(resolve(route.path), Some(route));
            assert_eq!(path_for(route.view), route.path);
            assert_eq!(route.name, route.view.to_string());
        }
    }

    #[test]
    fn root_is_dashboard() {
        assert_eq!(resolve_view("/"), Some(View::Dashboard));
        assert_eq!(resolve_view(""), Some(View::Dashboard));
        assert_eq!(resolve_view("/?tab=week"), Some(View::Dashboard));
    }

    #[test]
    fn matching_is_lenient_on_case_slash_and_query() {
        assert_eq!(resolve_view("/Orders"), Some(View::Orders));
        assert_eq!(resolve_view("/materials/"), Some(View::Materials));
        assert_eq!(resolve_view("/analytics?range=30d#chart"), Some(View::Analytics));
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert_eq!(resolve_view("/orders/42"), None);
        assert_eq!(resolve_view("/schedules"), None);
        assert_eq!(resolve_view("/schedule//"), None);
        assert_eq!(resolve_view("/#/schedule"), Some(View::Dashboard));
    }
}
