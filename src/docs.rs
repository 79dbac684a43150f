use utoipa::OpenApi;

use crate::modules::attendance::model::{
    AttendanceHistoryEntry, AttendanceLine, PaginatedAttendanceHistory,
    PaginatedStudentAttendance, RosterEntry, RosterResponse, SaveAttendanceDto,
    StudentAttendanceRecord,
};
use crate::modules::registration_numbers::model::{
    AvailableRegistrationNumber, BulkGenerateRegistrationNumbersDto,
    BulkGeneratedRegistrationNumbers, GenerateRegistrationNumberDto, GeneratedRegistrationNumber,
    UsedRegistrationNumber,
};
use crate::modules::registrations::model::{RegisterStudentDto, Student, StudentWithSpecialty};
use crate::modules::schedules::model::{
    CreateScheduleDto, GroupsResponse, ScheduleWithDetails, UpdateScheduleDto,
};
use crate::modules::sessions::model::{
    DaySessions, Session, SessionsResponse, StudentWeekResponse, TeacherWeekResponse,
    WeekSelector,
};
use rollcall_core::{PaginationMeta, PaginationParams};
use rollcall_models::{AttendanceStatus, ScheduleDay, StudyMode};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::registration_numbers::controller::generate_registration_number,
        crate::modules::registration_numbers::controller::generate_registration_numbers_bulk,
        crate::modules::registration_numbers::controller::list_available_registration_numbers,
        crate::modules::registration_numbers::controller::list_used_registration_numbers,
        crate::modules::registration_numbers::controller::delete_registration_number,
        crate::modules::registrations::controller::register_student,
        crate::modules::registrations::controller::list_pending_registrations,
        crate::modules::registrations::controller::approve_registration,
        crate::modules::registrations::controller::reject_registration,
        crate::modules::registrations::controller::delete_student,
        crate::modules::schedules::controller::list_schedules,
        crate::modules::schedules::controller::create_schedule,
        crate::modules::schedules::controller::list_schedule_groups,
        crate::modules::schedules::controller::get_schedule,
        crate::modules::schedules::controller::update_schedule,
        crate::modules::schedules::controller::delete_schedule,
        crate::modules::sessions::controller::list_teacher_sessions,
        crate::modules::sessions::controller::get_teacher_week,
        crate::modules::sessions::controller::get_student_week,
        crate::modules::attendance::controller::get_session_roster,
        crate::modules::attendance::controller::save_session_attendance,
        crate::modules::attendance::controller::get_attendance_history,
        crate::modules::attendance::controller::get_student_attendance,
    ),
    components(
        schemas(
            GenerateRegistrationNumberDto,
            BulkGenerateRegistrationNumbersDto,
            GeneratedRegistrationNumber,
            BulkGeneratedRegistrationNumbers,
            AvailableRegistrationNumber,
            UsedRegistrationNumber,
            RegisterStudentDto,
            Student,
            StudentWithSpecialty,
            CreateScheduleDto,
            UpdateScheduleDto,
            ScheduleWithDetails,
            GroupsResponse,
            Session,
            DaySessions,
            SessionsResponse,
            TeacherWeekResponse,
            StudentWeekResponse,
            WeekSelector,
            RosterEntry,
            RosterResponse,
            AttendanceLine,
            SaveAttendanceDto,
            AttendanceHistoryEntry,
            PaginatedAttendanceHistory,
            StudentAttendanceRecord,
            PaginatedStudentAttendance,
            ScheduleDay,
            StudyMode,
            AttendanceStatus,
            PaginationMeta,
            PaginationParams,
        )
    ),
    tags(
        (name = "Registration Numbers", description = "Issuing and tracking registration numbers"),
        (name = "Registrations", description = "Student registration and approval"),
        (name = "Students", description = "Student records"),
        (name = "Schedules", description = "Weekly schedule templates"),
        (name = "Sessions", description = "Dated sessions derived from templates"),
        (name = "Attendance", description = "Attendance taking and history")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "Registration numbers, weekly schedules and attendance for a training institute.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;
