mod activity_vm;
mod dashboard_vm;
mod final_project_vm;
mod labels;
mod lesson_vm;
mod markdown_vm;
mod module_vm;
mod page_vm;
mod time_fmt;

pub use activity_vm::{ActivityFormVm, FormFieldVm};
pub use dashboard_vm::{DashboardVm, ModuleCardVm, ResumeVm, map_dashboard, module_route};
pub use final_project_vm::{AnnexVm, FinalProjectVm, map_final_project};
pub use labels::{activity_kind_label, lesson_kind_label};
pub use lesson_vm::{LessonPageVm, map_lesson_page};
pub use markdown_vm::{
    TextBlock, markdown_to_blocks, markdown_to_html, normalize_markdown, sanitize_html,
};
pub use module_vm::{LessonRowVm, ModulePageVm, map_module_page};
pub use page_vm::{NotFoundVm, PageVm};
pub use time_fmt::{format_date, format_minutes};
