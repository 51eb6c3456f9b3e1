//! Ordered student roster.
//!
//! # Invariants
//! - Insertion order is display order; nothing re-sorts the roster.
//! - Lookups by roll/name are exact matches.

use crate::model::student::{Student, StudentId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_students(students: Vec<Student>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn contains(&self, id: &StudentId) -> bool {
        self.position(id).is_some()
    }

    pub fn find_by_id(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|student| &student.id == id)
    }

    pub fn find_by_id_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| &student.id == id)
    }

    /// First student carrying exactly `roll`. Empty rolls never match.
    pub fn find_by_roll(&self, roll: &str) -> Option<&Student> {
        if roll.is_empty() {
            return None;
        }
        self.students.iter().find(|student| student.roll == roll)
    }

    /// First student named exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Student> {
        if name.is_empty() {
            return None;
        }
        self.students.iter().find(|student| student.name == name)
    }

    pub fn roll_in_use(&self, roll: &str) -> bool {
        self.find_by_roll(roll).is_some()
    }

    /// Appends at the roster tail.
    pub fn push(&mut self, student: Student) {
        self.students.push(student);
    }

    pub fn remove(&mut self, id: &StudentId) -> Option<Student> {
        let index = self.position(id)?;
        Some(self.students.remove(index))
    }

    pub fn clear(&mut self) {
        self.students.clear();
    }

    fn position(&self, id: &StudentId) -> Option<usize> {
        self.students.iter().position(|student| &student.id == id)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
