//! Plain-text rendering of page view models for the terminal.

use std::fmt::{self, Write};

use course_core::model::LessonId;

use ui::vm::{
    ActivityFormVm, DashboardVm, FinalProjectVm, LessonPageVm, ModuleCardVm, ModulePageVm,
    NotFoundVm, PageVm, TextBlock,
};

const BAR_WIDTH: usize = 20;

#[must_use]
pub fn render_page(page: &PageVm) -> String {
    let mut out = String::new();
    write_page(&mut out, page).ok();
    out
}

fn write_page(out: &mut String, page: &PageVm) -> fmt::Result {
    match page {
        PageVm::Dashboard(vm) => dashboard(out, vm),
        PageVm::Module(vm) => module(out, vm),
        PageVm::Lesson(vm) => lesson(out, vm),
        PageVm::FinalProject(vm) => final_project(out, vm),
        PageVm::NotFound(vm) => not_found(out, vm),
    }
}

#[must_use]
pub fn progress_bar(percentage: u8) -> String {
    let filled = usize::from(percentage.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {percentage}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

fn dashboard(out: &mut String, vm: &DashboardVm) -> fmt::Result {
    writeln!(out, "{}", vm.title)?;
    writeln!(out, "{}", vm.subtitle)?;
    writeln!(out, "{} · {}", vm.author, vm.estimated_time)?;
    writeln!(out)?;
    writeln!(out, "Tu progreso: {}", progress_bar(vm.percentage))?;
    writeln!(out, "{} · desde {}", vm.progress_label, vm.started_on)?;
    if vm.course_completed {
        writeln!(out, "¡Curso completado!")?;
    }
    if let Some(resume) = &vm.resume {
        writeln!(
            out,
            "Continuar: {} ({}) -> {}",
            resume.lesson_title, resume.module_title, resume.route
        )?;
    }

    if let Some(master_class) = &vm.master_class {
        writeln!(out)?;
        writeln!(out, "Clase magistral")?;
        module_card(out, master_class)?;
    }
    writeln!(out)?;
    writeln!(out, "Módulos del taller")?;
    for card in &vm.modules {
        module_card(out, card)?;
    }
    writeln!(out)?;
    writeln!(out, "Proyecto final -> {}", vm.final_project)
}

fn module_card(out: &mut String, card: &ModuleCardVm) -> fmt::Result {
    let check = if card.stats.is_complete() { "x" } else { " " };
    writeln!(out, "  [{check}] {} -> {}", card.title, card.route)?;
    writeln!(
        out,
        "      {}/{} lecciones · {} · {}",
        card.stats.completed, card.stats.total, card.duration_label,
        progress_bar(card.stats.percentage)
    )
}

fn module(out: &mut String, vm: &ModulePageVm) -> fmt::Result {
    writeln!(out, "{}", vm.title)?;
    writeln!(out, "{}", vm.description)?;
    writeln!(out, "{} · {}", vm.duration_label, progress_bar(vm.stats.percentage))?;
    writeln!(out)?;
    for row in &vm.lessons {
        let check = if row.completed { "x" } else { " " };
        let activity = if row.has_activity { " · actividad" } else { "" };
        writeln!(
            out,
            "  [{check}] {}. {} ({}, {}{activity}) -> {}",
            row.number, row.title, row.kind_label, row.duration, row.route
        )?;
    }
    if let Some(start) = &vm.start {
        writeln!(out)?;
        writeln!(out, "Empezar -> {start}")?;
    }
    Ok(())
}

fn lesson(out: &mut String, vm: &LessonPageVm) -> fmt::Result {
    writeln!(out, "{} -> {}", vm.module_title, vm.module_route)?;
    writeln!(out, "{} · {}", vm.kind_label.to_uppercase(), vm.duration)?;
    writeln!(out, "{}", vm.title)?;
    if vm.completed {
        writeln!(out, "Completado")?;
    }
    writeln!(out)?;
    blocks(out, &vm.body)?;

    if let Some(activity) = &vm.activity {
        writeln!(out)?;
        activity_form(out, activity, Some(&vm.lesson_id))?;
    }
    if vm.can_mark_complete {
        writeln!(out)?;
        writeln!(out, "Marcar como terminada: course complete {}", vm.lesson_id)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", vm.position_label)?;
    if let Some(previous) = &vm.previous {
        writeln!(out, "Anterior -> {previous}")?;
    }
    writeln!(out, "{} -> {}", vm.next_label, vm.next)
}

fn activity_form(
    out: &mut String,
    form: &ActivityFormVm,
    lesson_id: Option<&LessonId>,
) -> fmt::Result {
    writeln!(out, "{}: {}", form.kind_label, form.title)?;
    if !form.description.is_empty() {
        writeln!(out, "{}", form.description)?;
    }
    for (index, field) in form.fields.iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, field.label)?;
        if let Some(answer) = &field.answer {
            writeln!(out, "     > {answer}")?;
        }
    }
    if form.submitted {
        writeln!(out, "Respuestas guardadas.")?;
    }
    match lesson_id {
        Some(id) => writeln!(
            out,
            "Responder: course submit {id} --answer ... ({} respuestas)",
            form.fields.len()
        ),
        None => Ok(()),
    }
}

fn blocks(out: &mut String, body: &[TextBlock]) -> fmt::Result {
    for block in body {
        match block {
            TextBlock::Heading { level, text } => {
                writeln!(out, "{} {text}", "#".repeat(usize::from(*level)))?;
            }
            TextBlock::Paragraph(text) => writeln!(out, "{text}")?,
            TextBlock::ListItem(text) => writeln!(out, "  • {text}")?,
            TextBlock::Quote(text) => writeln!(out, "  │ {text}")?,
        }
    }
    Ok(())
}

fn final_project(out: &mut String, vm: &FinalProjectVm) -> fmt::Result {
    writeln!(out, "{}", vm.title)?;
    if vm.completed {
        writeln!(out, "Completado")?;
    }
    writeln!(out)?;
    blocks(out, &vm.body)?;
    if let Some(activity) = &vm.activity {
        writeln!(out)?;
        activity_form(out, activity, vm.lesson_id.as_ref())?;
    }
    if !vm.annexes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Anexos y plantillas")?;
        for annex in &vm.annexes {
            writeln!(out, "  - {}: {} ({})", annex.title, annex.description, annex.link)?;
        }
    }
    Ok(())
}

fn not_found(out: &mut String, vm: &NotFoundVm) -> fmt::Result {
    writeln!(out, "{}", vm.title)?;
    writeln!(out, "{}", vm.message)?;
    writeln!(out, "Volver al inicio -> {}", vm.back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_with_percentage() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}] 50%", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(20)));
    }

    #[test]
    fn page_writer_renders_the_same_text() {
        let page = PageVm::NotFound(NotFoundVm::module());
        let mut out = String::new();
        write_page(&mut out, &page).unwrap();
        assert_eq!(out, render_page(&page));
        assert!(out.contains("Volver al inicio -> /"));
    }

    #[test]
    fn not_found_points_home() {
        let text = render_page(&PageVm::NotFound(NotFoundVm::lesson()));
        assert!(text.starts_with("Lección no encontrada\n"));
        assert!(text.ends_with("Volver al inicio -> /\n"));
    }
}
