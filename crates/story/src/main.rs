use gpui::*;
use gpui_component::Root;
use tracing_subscriber::EnvFilter;

use gpui_sortable_story::course::CourseOrganizer;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        gpui_sortable::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Course Organizer".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = CourseOrganizer::view(window, cx);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            tracing::info!("course organizer window opened");
            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });
}
