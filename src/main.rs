use quickdraw::prelude::*;

fn main() {
    let result = quickdraw("Quick Context").run(|_window, ctx| {
        ctx.set_source_rgb(0.0, 0.0, 255.0);
        ctx.select_font_face("Space Age", FontSlant::Italic, FontWeight::Bold);
        ctx.set_font_size(20.0);
        ctx.move_to(20.0, 20.0);
        ctx.show_text("Hello, World!")
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
