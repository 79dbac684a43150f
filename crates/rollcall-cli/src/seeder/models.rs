//! Seed data and seeding configuration.

use chrono::NaiveTime;
use rollcall_models::ids::{ModuleId, SpecialtyId, TeacherId};
use rollcall_models::{ScheduleDay, StudyMode};

/// Description stamped on seeded specialties so they can be cleared later.
pub const SEED_MARKER: &str = "Seeded by rollcall-cli";

/// Domain of every seeded teacher and student email.
pub const SEED_EMAIL_DOMAIN: &str = "seed.example.com";

pub struct SpecialtySeed {
    pub name: String,
    pub code: String,
    pub duration_semesters: i32,
}

pub struct ModuleSeed {
    pub specialty_id: SpecialtyId,
    pub code: String,
    pub name: String,
    pub semester: i32,
    pub hours_per_week: i32,
}

pub struct TeacherSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub struct StudentSeed {
    pub specialty_id: SpecialtyId,
    pub registration_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub study_mode: StudyMode,
    pub group: Option<String>,
}

pub struct ScheduleSeed {
    pub module_id: ModuleId,
    pub teacher_id: TeacherId,
    pub specialty_id: SpecialtyId,
    pub day: ScheduleDay,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub classroom: String,
    pub semester: i32,
    pub academic_year: String,
}

/// How much data to generate.
#[derive(Clone)]
pub struct SeedConfig {
    pub specialties: usize,
    pub modules_per_specialty: usize,
    pub teachers: usize,
    pub students_per_specialty: usize,
    /// Calendar year the registration numbers and academic year derive from
    pub year: i32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            specialties: 3,
            modules_per_specialty: 6,
            teachers: 8,
            students_per_specialty: 30,
            year: 2025,
        }
    }
}

impl SeedConfig {
    pub fn new(specialties: usize) -> Self {
        Self {
            specialties,
            ..Default::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_students(mut self, students_per_specialty: usize) -> Self {
        self.students_per_specialty = students_per_specialty;
        self
    }

    pub fn with_modules(mut self, modules_per_specialty: usize) -> Self {
        self.modules_per_specialty = modules_per_specialty;
        self
    }
}
