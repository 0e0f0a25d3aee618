use std::fmt;

use course_core::model::{LessonId, ModuleId};

/// Every page the course can show.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    MasterClass,
    Module { module_id: ModuleId },
    Lesson { lesson_id: LessonId },
    FinalProject,
}

impl Route {
    pub const HOME_PATH: &'static str = "/";
    pub const MASTER_CLASS_PATH: &'static str = "/master-class";
    pub const FINAL_PROJECT_PATH: &'static str = "/proyecto-final";

    const MODULE_PREFIX: &'static str = "/modulo/";
    const LESSON_PREFIX: &'static str = "/leccion/";

    /// Resolve a path. Anything unrecognized lands on `Home`.
    ///
    /// A trailing slash and a query string or fragment are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match path {
            Self::MASTER_CLASS_PATH => return Self::MasterClass,
            Self::FINAL_PROJECT_PATH => return Self::FinalProject,
            _ => {}
        }

        if let Some(module_id) = path
            .strip_prefix(Self::MODULE_PREFIX)
            .and_then(single_segment)
            .and_then(|s| s.parse().ok())
        {
            return Self::Module { module_id };
        }

        if let Some(lesson_id) = path
            .strip_prefix(Self::LESSON_PREFIX)
            .and_then(single_segment)
            .and_then(|s| s.parse().ok())
        {
            return Self::Lesson { lesson_id };
        }

        Self::Home
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => Self::HOME_PATH.to_owned(),
            Self::MasterClass => Self::MASTER_CLASS_PATH.to_owned(),
            Self::Module { module_id } => format!("{}{module_id}", Self::MODULE_PREFIX),
            Self::Lesson { lesson_id } => format!("{}{lesson_id}", Self::LESSON_PREFIX),
            Self::FinalProject => Self::FINAL_PROJECT_PATH.to_owned(),
        }
    }

    #[must_use]
    pub fn module(module_id: ModuleId) -> Self {
        Self::Module { module_id }
    }

    #[must_use]
    pub fn lesson(lesson_id: LessonId) -> Self {
        Self::Lesson { lesson_id }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn single_segment(raw: &str) -> Option<&str> {
    (!raw.is_empty() && !raw.contains('/')).then_some(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_parse_and_format_back() {
        let routes = [
            Route::Home,
            Route::MasterClass,
            Route::FinalProject,
            Route::module("mod-1".parse().unwrap()),
            Route::lesson("les-1-2".parse().unwrap()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        for path in [
            "",
            "/nope",
            "/modulo/",
            "/leccion/",
            "/leccion/a/b",
            "master-class",
        ] {
            assert_eq!(Route::parse(path), Route::Home, "{path}");
        }
    }

    #[test]
    fn trailing_slash_and_query_are_ignored() {
        assert_eq!(Route::parse("/master-class/"), Route::MasterClass);
        assert_eq!(
            Route::parse("/leccion/les-final?from=home"),
            Route::lesson("les-final".parse().unwrap())
        );
        assert_eq!(Route::parse("/proyecto-final#top"), Route::FinalProject);
    }

    #[test]
    fn display_matches_path() {
        let route = Route::module("mod-3".parse().unwrap());
        assert_eq!(route.to_string(), "/modulo/mod-3");
    }
}
