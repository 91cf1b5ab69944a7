// ==========================================
// 高校排课系统 - 求解服务层
// ==========================================
// 职责: 求解请求/响应报文, 网关抽象与 HTTP 实现
// 红线: 求解算法本身不在本系统内, 求解服务视为黑盒
// ==========================================

pub mod gateway;
pub mod http_gateway;
pub mod payload;

pub use gateway::{validate_response, SolverError, SolverGateway, STATUS_SUCCESS};
pub use http_gateway::HttpSolverGateway;
pub use payload::{
    ClassroomPayload, ClassroomsPayload, CoursePayload, RawAssignment, SectionPayload,
    SolverRequest, SolverResponse, SolverSolution, TeacherPayload,
};
