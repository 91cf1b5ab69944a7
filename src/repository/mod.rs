// ==========================================
// 高校排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod classroom_repo;
pub mod course_repo;
pub mod db_utils;
pub mod error;
pub mod period_repo;
pub mod preference_repo;
pub mod registration_repo;
pub mod schedule_repo;
pub mod teacher_repo;

// 重导出核心仓储
pub use classroom_repo::ClassroomRepository;
pub use course_repo::{CourseRepository, SectionRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use period_repo::PeriodRepository;
pub use preference_repo::{CoursePreferenceRepository, TimePreferenceRepository};
pub use registration_repo::TeachingRegistrationRepository;
pub use schedule_repo::ScheduleRepository;
pub use teacher_repo::{SemesterRepository, TeacherRepository};
