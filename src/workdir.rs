//! Working-directory resolution: which course we are in and which exercises a
//! submit command targets.

use std::path::{Component, Path, PathBuf};

use crate::engine::SubmitError;
use crate::manifest::MANIFEST_FILE;
use crate::models::{CourseInfo, Exercise};

/// The directory a command was started from and the course directory above it.
#[derive(Debug, Clone)]
pub struct WorkDir {
    cwd: PathBuf,
    course_dir: Option<PathBuf>,
}

impl WorkDir {
    /// Find the course directory by walking up from `cwd` to the first directory
    /// holding a course manifest.
    pub fn discover(cwd: impl Into<PathBuf>) -> Self {
        let cwd = normalize(&cwd.into());
        let course_dir = cwd
            .ancestors()
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
            .map(Path::to_path_buf);
        Self { cwd, course_dir }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn course_dir(&self) -> Option<&Path> {
        self.course_dir.as_deref()
    }

    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.course_dir.as_ref().map(|dir| dir.join(MANIFEST_FILE))
    }

    /// Exercise names a path refers to, or `None` when it is not inside the course.
    ///
    /// The course directory itself refers to every exercise present on disk; any
    /// path inside an exercise directory refers to that exercise.
    fn exercises_at(&self, path: &Path, info: &CourseInfo) -> Option<Vec<String>> {
        let course_dir = self.course_dir.as_ref()?;
        let absolute = normalize(&self.cwd.join(path));
        let relative = absolute.strip_prefix(course_dir).ok()?;

        match relative.components().next() {
            None => Some(
                info.course
                    .exercises
                    .iter()
                    .filter(|e| course_dir.join(&e.name).is_dir())
                    .map(|e| e.name.clone())
                    .collect(),
            ),
            Some(Component::Normal(first)) => {
                let name = first.to_str()?;
                let known = info.course.exercise(name).is_some();
                (known && course_dir.join(name).is_dir()).then(|| vec![name.to_string()])
            }
            Some(_) => None,
        }
    }
}

/// Resolve the exercises a submit command targets.
///
/// - no arguments: the current directory must resolve to exactly one exercise
/// - arguments: each must be a path to a known exercise or to the course itself
/// - `only_tested`: every locally tested exercise the server has not marked completed
pub fn select_exercises(
    workdir: &WorkDir,
    info: &CourseInfo,
    args: &[String],
    only_tested: bool,
) -> Result<Vec<Exercise>, SubmitError> {
    if workdir.course_dir().is_none() {
        return Err(SubmitError::NoCourse);
    }

    if only_tested {
        for arg in args {
            workdir
                .exercises_at(Path::new(arg), info)
                .ok_or_else(|| SubmitError::InvalidExercise(arg.clone()))?;
        }
        let tested: Vec<Exercise> = info
            .course
            .exercises
            .iter()
            .filter(|e| info.is_locally_tested(e) && !e.completed)
            .cloned()
            .collect();
        if tested.is_empty() {
            return Err(SubmitError::NoLocallyTested);
        }
        return Ok(tested);
    }

    let mut names: Vec<String> = Vec::new();
    if args.is_empty() {
        let here = workdir.exercises_at(Path::new("."), info).unwrap_or_default();
        if here.len() != 1 {
            return Err(SubmitError::NoExerciseGiven);
        }
        names = here;
    }
    for arg in args {
        let found = workdir
            .exercises_at(Path::new(arg), info)
            .ok_or_else(|| SubmitError::InvalidExercise(arg.clone()))?;
        for name in found {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let exercises: Vec<Exercise> = names
        .iter()
        .filter_map(|name| info.course.exercise(name).cloned())
        .collect();
    if exercises.is_empty() {
        return Err(SubmitError::NoExercises);
    }
    Ok(exercises)
}

/// Lexically resolve `.` and `..` without touching the file system.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::models::Course;

    fn course_info() -> CourseInfo {
        CourseInfo::new(Course {
            id: 1,
            name: "java-course".to_string(),
            details_url: "https://example.org/api/v8/core/courses/1".to_string(),
            exercises: vec![
                Exercise::new(1, "part01-ex01"),
                Exercise::new(2, "part01-ex02"),
                Exercise::new(3, "part01-ex03"),
            ],
        })
    }

    /// Course directory with a manifest marker and the first two exercises on disk.
    fn course_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();
        fs::create_dir_all(dir.path().join("part01-ex01/src")).unwrap();
        fs::create_dir_all(dir.path().join("part01-ex02")).unwrap();
        dir
    }

    fn names(exercises: &[Exercise]) -> Vec<&str> {
        exercises.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn discovers_course_from_nested_directory() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path().join("part01-ex01/src"));
        assert_eq!(workdir.course_dir(), Some(dir.path()));
    }

    #[test]
    fn outside_course_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let workdir = WorkDir::discover(dir.path());
        let err = select_exercises(&workdir, &course_info(), &[], false).unwrap_err();
        assert!(matches!(err, SubmitError::NoCourse));
    }

    #[test]
    fn no_args_inside_exercise_selects_it() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path().join("part01-ex01/src"));
        let selected = select_exercises(&workdir, &course_info(), &[], false).unwrap();
        assert_eq!(names(&selected), vec!["part01-ex01"]);
    }

    #[test]
    fn no_args_at_course_root_needs_an_argument() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path());
        let err = select_exercises(&workdir, &course_info(), &[], false).unwrap_err();
        assert!(matches!(err, SubmitError::NoExerciseGiven));
    }

    #[test]
    fn args_resolve_relative_to_cwd() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path().join("part01-ex01"));
        let args = vec!["../part01-ex02".to_string(), ".".to_string()];
        let selected = select_exercises(&workdir, &course_info(), &args, false).unwrap();
        assert_eq!(names(&selected), vec!["part01-ex02", "part01-ex01"]);
    }

    #[test]
    fn course_root_argument_selects_exercises_on_disk() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path());
        let selected =
            select_exercises(&workdir, &course_info(), &[".".to_string()], false).unwrap();
        assert_eq!(names(&selected), vec!["part01-ex01", "part01-ex02"]);
    }

    #[test]
    fn unknown_or_missing_exercise_is_invalid() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path());
        for arg in ["part01-ex03", "nope", "../elsewhere"] {
            let err = select_exercises(&workdir, &course_info(), &[arg.to_string()], false)
                .unwrap_err();
            assert_eq!(err.to_string(), format!("Error: {} is not a valid exercise.", arg));
        }
    }

    #[test]
    fn only_tested_selects_uncompleted_locally_tested() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path());
        let mut info = course_info();
        info.local_completed_exercises.insert("part01-ex01".to_string());
        info.local_completed_exercises.insert("part01-ex02".to_string());
        info.course.exercise_mut("part01-ex02").unwrap().completed = true;
        info.course.exercise_mut("part01-ex03").unwrap().locally_tested = true;

        let selected = select_exercises(&workdir, &info, &[], true).unwrap();
        assert_eq!(names(&selected), vec!["part01-ex01", "part01-ex03"]);
    }

    #[test]
    fn only_tested_with_nothing_tested() {
        let dir = course_dir();
        let workdir = WorkDir::discover(dir.path());
        let err = select_exercises(&workdir, &course_info(), &[], true).unwrap_err();
        assert!(matches!(err, SubmitError::NoLocallyTested));
    }
}
