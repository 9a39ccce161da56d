pub mod user_repo;
pub use user_repo::UserRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod department_repo;
pub use department_repo::DepartmentRepository;
pub mod role_repo;
pub use role_repo::RoleRepository;
