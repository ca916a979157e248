use std::collections::HashMap;

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use gpui_component::{Icon, IconName, Sizable as _, h_flex, v_flex};
use gpui_sortable::{
    ActivationConstraint, ContainerRenderProps, ItemRenderProps, NestedSource, RawId, SortMap,
    SortableContainersState, SortableOptions, sortable_containers,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    Reading,
    Quiz,
}

impl LessonKind {
    fn icon(self) -> IconName {
        match self {
            LessonKind::Video => IconName::Globe,
            LessonKind::Reading => IconName::File,
            LessonKind::Quiz => IconName::Check,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub kind: LessonKind,
    /// Published lessons stay where they are.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

/// Sections of a course, each holding its lessons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseOutline {
    pub sections: Vec<Section>,
}

impl CourseOutline {
    /// The outline in the order `map` describes. Ids the map does not know
    /// about are dropped.
    pub fn reordered(&self, map: &SortMap) -> CourseOutline {
        let lessons: HashMap<RawId, &Lesson> = self
            .sections
            .iter()
            .flat_map(|section| &section.lessons)
            .map(|lesson| (RawId::from(lesson.id), lesson))
            .collect();
        let sections: HashMap<RawId, &Section> = self
            .sections
            .iter()
            .map(|section| (RawId::from(section.id.as_str()), section))
            .collect();

        let sections = map
            .iter()
            .filter_map(|(container, items)| {
                let section = sections.get(container.raw())?;
                Some(Section {
                    id: section.id.clone(),
                    title: section.title.clone(),
                    lessons: items
                        .iter()
                        .filter_map(|item| lessons.get(item.raw()).map(|lesson| (*lesson).clone()))
                        .collect(),
                })
            })
            .collect();
        CourseOutline { sections }
    }
}

impl NestedSource for CourseOutline {
    type Container = Section;
    type Item = Lesson;

    fn containers(&self) -> &[Section] {
        &self.sections
    }

    fn container_id(&self, section: &Section) -> Option<RawId> {
        Some(RawId::from(section.id.as_str()))
    }

    fn items<'a>(&'a self, section: &'a Section) -> &'a [Lesson] {
        &section.lessons
    }

    fn item_id(&self, lesson: &Lesson) -> Option<RawId> {
        Some(RawId::from(lesson.id))
    }

    fn item_disabled(&self, lesson: &Lesson) -> bool {
        lesson.locked
    }
}

pub struct CourseOrganizer {
    board: Entity<SortableContainersState<CourseOutline>>,
    last_change: Option<String>,
    changes: usize,
}

impl CourseOrganizer {
    pub fn view(_window: &mut Window, cx: &mut App) -> Entity<Self> {
        cx.new(|cx| {
            let this = cx.entity().downgrade();
            let board = cx.new(|cx| {
                SortableContainersState::new(demo_outline(), cx)
                    .options(
                        SortableOptions::default()
                            .activation(Some(ActivationConstraint::Distance { distance: 4. })),
                    )
                    .on_sort_change(move |map, _window, cx| {
                        let _ = this.update(cx, |this: &mut CourseOrganizer, cx| this.apply_sort_change(map, cx));
                    })
            });
            Self {
                board,
                last_change: None,
                changes: 0,
            }
        })
    }

    fn apply_sort_change(&mut self, map: &SortMap, cx: &mut Context<Self>) {
        let outline = self.board.read(cx).controller().source().reordered(map);
        match serde_json::to_string_pretty(map) {
            Ok(json) => self.last_change = Some(json),
            Err(err) => tracing::warn!(%err, "failed to serialize sort change"),
        }
        self.changes += 1;
        self.board
            .update(cx, |board, cx| board.set_source(outline, cx));
        cx.notify();
    }
}

impl Render for CourseOrganizer {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let dump = self
            .last_change
            .clone()
            .unwrap_or_else(|| "<no changes yet>".to_string());

        v_flex()
            .size_full()
            .p(px(16.))
            .gap_y_3()
            .child(
                v_flex()
                    .gap_y_1()
                    .child(
                        div()
                            .text_xl()
                            .font_weight(FontWeight::BOLD)
                            .child("Course Organizer"),
                    )
                    .child(div().text_sm().text_color(theme.muted_foreground).child(
                        "Drag lessons between sections, or drag a section header to reorder sections. \
                         Select a lesson and press space to pick it up with the keyboard; \
                         arrows move it, space drops, escape cancels. Locked lessons cannot move.",
                    ))
                    .child(
                        div()
                            .text_sm()
                            .text_color(theme.muted_foreground)
                            .child(format!("Committed changes: {}", self.changes)),
                    ),
            )
            .child(
                h_flex()
                    .flex_1()
                    .min_h(px(0.))
                    .items_start()
                    .gap_x_3()
                    .child(
                        div().flex_1().min_w(px(0.)).child(sortable_containers(
                            &self.board,
                            render_section,
                            render_lesson,
                        )),
                    )
                    .child(
                        v_flex()
                            .w(px(320.))
                            .h_full()
                            .gap_y_2()
                            .child(
                                div()
                                    .text_sm()
                                    .font_weight(FontWeight::MEDIUM)
                                    .child("Last sort change"),
                            )
                            .child(
                                div()
                                    .flex_1()
                                    .min_h(px(0.))
                                    .rounded(px(12.))
                                    .border_1()
                                    .border_color(theme.border)
                                    .bg(theme.background)
                                    .p(px(12.))
                                    .child(render_dump(dump)),
                            ),
                    ),
            )
    }
}

fn render_section(
    section: &Section,
    props: ContainerRenderProps,
    _window: &mut Window,
    cx: &mut App,
) -> AnyElement {
    let theme = cx.theme();
    h_flex()
        .gap_x_2()
        .items_center()
        .py(px(4.))
        .when(props.handle, |this| this.pl(px(24.)))
        .child(
            Icon::from(IconName::Menu)
                .small()
                .text_color(theme.muted_foreground),
        )
        .child(
            div()
                .flex_1()
                .font_weight(FontWeight::SEMIBOLD)
                .child(section.title.clone()),
        )
        .child(
            div()
                .text_xs()
                .text_color(theme.muted_foreground)
                .child(format!("{} lessons", section.lessons.len())),
        )
        .into_any_element()
}

fn render_lesson(
    lesson: &Lesson,
    props: ItemRenderProps,
    _window: &mut Window,
    cx: &mut App,
) -> AnyElement {
    let theme = cx.theme();
    h_flex()
        .gap_x_2()
        .items_center()
        .px(px(10.))
        .py(px(6.))
        .rounded(px(6.))
        .border_1()
        .border_color(theme.border)
        .bg(theme.popover)
        .text_sm()
        .when(props.handle_props.is_some(), |this| this.pl(px(28.)))
        .when(props.is_dragging, |this| this.opacity(0.4))
        .when(props.is_overlay, |this| this.shadow_md())
        .when(lesson.locked, |this| this.text_color(theme.muted_foreground))
        .child(
            Icon::from(lesson.kind.icon())
                .small()
                .text_color(theme.muted_foreground),
        )
        .child(div().flex_1().child(lesson.title.clone()))
        .into_any_element()
}

fn render_dump(text: String) -> impl IntoElement {
    let lines = text
        .lines()
        .map(|line| div().text_xs().child(line.to_string()));
    v_flex().gap_y_0p5().children(lines)
}

fn lesson(id: u32, title: &str, kind: LessonKind) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        kind,
        locked: false,
    }
}

fn demo_outline() -> CourseOutline {
    CourseOutline {
        sections: vec![
            Section {
                id: "intro".into(),
                title: "Getting started".into(),
                lessons: vec![
                    Lesson {
                        locked: true,
                        ..lesson(1, "Welcome", LessonKind::Video)
                    },
                    lesson(2, "How this course works", LessonKind::Reading),
                    lesson(3, "Setting up your tools", LessonKind::Video),
                ],
            },
            Section {
                id: "basics".into(),
                title: "The basics".into(),
                lessons: vec![
                    lesson(4, "Ownership", LessonKind::Video),
                    lesson(5, "Borrowing", LessonKind::Reading),
                    lesson(6, "Checkpoint", LessonKind::Quiz),
                ],
            },
            Section {
                id: "project".into(),
                title: "Final project".into(),
                lessons: vec![lesson(7, "Project brief", LessonKind::Reading)],
            },
            Section {
                id: "bonus".into(),
                title: "Bonus material".into(),
                lessons: Vec::new(),
            },
        ],
    }
}
