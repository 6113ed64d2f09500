extern crate quickdraw;

use std::f32::consts::{FRAC_PI_4, PI, TAU};

use quickdraw::prelude::*;

fn main() {
    let result = quickdraw("Shapes")
        .with_size(Point2::new(640, 480))
        .with_background(Color::LIGHTGRAY)
        .run(|window, ctx| {
            let size = window.size();

            // Frame around the whole surface.
            ctx.set_source_color(Color::GRAY);
            ctx.set_line_width(4.0);
            ctx.rectangle(10.0, 10.0, size.x as f32 - 20.0, size.y as f32 - 20.0);
            ctx.stroke();

            ctx.set_source_color(Color::CORNFLOWERBLUE);
            ctx.arc(160.0, 160.0, 80.0, 0.0, TAU);
            ctx.fill_preserve();
            ctx.set_source_color(Color::BLACK);
            ctx.set_line_width(3.0);
            ctx.stroke();

            // Pie slice.
            ctx.set_source_color(Color::ORANGE);
            ctx.move_to(400.0, 160.0);
            ctx.arc(400.0, 160.0, 80.0, -PI / 3.0, PI / 2.0);
            ctx.close_path();
            ctx.fill();

            ctx.save();
            ctx.translate(160.0, 360.0);
            ctx.rotate(FRAC_PI_4);
            ctx.set_source_rgba(1.0, 0.0, 0.0, 0.6);
            ctx.rectangle(-50.0, -50.0, 100.0, 100.0);
            ctx.fill();
            ctx.restore();

            ctx.set_source_color(Color::GREEN);
            ctx.set_line_width(6.0);
            ctx.set_line_cap(LineCap::Round);
            ctx.move_to(300.0, 400.0);
            ctx.curve_to(360.0, 280.0, 460.0, 480.0, 560.0, 340.0);
            ctx.stroke();

            ctx.set_source_color(Color::BLACK);
            ctx.set_font_size(16.0);
            ctx.move_to(20.0, size.y as f32 - 24.0);
            ctx.show_text("Close the window to exit")
        });

    if let Err(e) = result {
        eprintln!("{}", e);
    }
}
