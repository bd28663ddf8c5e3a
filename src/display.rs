/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of what to
/// show. No game logic is performed; the simulation's `RenderModel` is
/// scaled from playfield units onto terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use danmaku_shooter::entities::Difficulty;
use danmaku_shooter::render::{ship_color, Drawable, RenderModel, Rgb, Shape, HEART_SPACING};
use danmaku_shooter::select::{SelectFocus, SelectMenu};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LABEL: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_WARNING: Color = Color::DarkRed;

/// Columns reserved right of the playfield for the side panel.
const PANEL_COLS: u16 = 26;

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

fn difficulty_color(d: Difficulty) -> Color {
    match d {
        Difficulty::Easy => Color::Green,
        Difficulty::Normal => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps playfield units onto the bordered cell rectangle starting at
/// (`left`, `top`).
#[derive(Clone, Copy)]
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(model: &RenderModel, term: (u16, u16)) -> Self {
        let cols = term.0.saturating_sub(PANEL_COLS + 2).max(1);
        let rows = term.1.saturating_sub(3).max(1);
        Self {
            left: 1,
            top: 1,
            cols,
            rows,
            sx: cols as f32 / model.playfield_width,
            sy: rows as f32 / model.playfield_height,
        }
    }

    /// Cell span covered by a playfield box, clipped; `None` when off screen.
    fn span(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(u16, u16, u16, u16)> {
        let c0 = (x * self.sx).floor();
        let r0 = (y * self.sy).floor();
        let c1 = ((x + w) * self.sx).ceil().max(c0 + 1.0);
        let r1 = ((y + h) * self.sy).ceil().max(r0 + 1.0);
        let (cols, rows) = (self.cols as f32, self.rows as f32);
        if c1 <= 0.0 || r1 <= 0.0 || c0 >= cols || r0 >= rows {
            return None;
        }
        Some((c0.max(0.0) as u16, r0.max(0.0) as u16, c1.min(cols) as u16, r1.min(rows) as u16))
    }

    fn panel_col(&self) -> u16 {
        self.left + self.cols + 2
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete game frame.
pub fn render<W: Write>(out: &mut W, model: &RenderModel, term: (u16, u16)) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let view = Viewport::new(model, term);

    draw_border(out, &view)?;
    if let Some(warning) = &model.warning {
        draw_warning(out, &view, warning)?;
    }
    for d in &model.drawables {
        draw_drawable(out, &view, d)?;
    }
    draw_hud(out, &view, model)?;
    if model.title_visible {
        draw_title(out, &view, model)?;
    }
    draw_controls_hint(out, term.1)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term.1.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.cols as usize;
    let bottom = view.top + view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(view.left - 1, view.top - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;
    out.queue(cursor::MoveTo(view.left - 1, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in view.top..bottom {
        out.queue(cursor::MoveTo(view.left - 1, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.left + view.cols, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill<W: Write>(
    out: &mut W,
    view: &Viewport,
    (c0, r0, c1, r1): (u16, u16, u16, u16),
    glyph: &str,
) -> std::io::Result<()> {
    let row_text = glyph.repeat((c1 - c0) as usize);
    for row in r0..r1 {
        out.queue(cursor::MoveTo(view.left + c0, view.top + row))?;
        out.queue(Print(&row_text))?;
    }
    Ok(())
}

fn draw_warning<W: Write>(out: &mut W, view: &Viewport, d: &Drawable) -> std::io::Result<()> {
    if let Some(span) = view.span(d.x, d.y, d.width, d.height) {
        out.queue(style::SetForegroundColor(C_WARNING))?;
        fill(out, view, span, "░")?;
    }
    Ok(())
}

fn draw_drawable<W: Write>(out: &mut W, view: &Viewport, d: &Drawable) -> std::io::Result<()> {
    let Some(span) = view.span(d.x, d.y, d.width, d.height) else {
        return Ok(());
    };
    let (c0, r0, c1, r1) = span;
    let single = c1 - c0 <= 1 && r1 - r0 <= 1;
    out.queue(style::SetForegroundColor(rgb(d.color)))?;

    match d.shape {
        Shape::Ship => {
            let cx = (c0 + c1) / 2;
            out.queue(cursor::MoveTo(view.left + cx, view.top + r0))?;
            out.queue(Print("▲"))?;
            if r0 + 1 < view.rows {
                out.queue(cursor::MoveTo(view.left + cx.saturating_sub(1), view.top + r0 + 1))?;
                out.queue(Print("/█\\"))?;
            }
        }
        Shape::Rect if single => {
            out.queue(cursor::MoveTo(view.left + c0, view.top + r0))?;
            out.queue(Print("║"))?;
        }
        Shape::Rect => fill(out, view, span, "█")?,
        Shape::Circle if single => {
            out.queue(cursor::MoveTo(view.left + c0, view.top + r0))?;
            out.queue(Print("•"))?;
        }
        Shape::Circle => fill(out, view, span, "▓")?,
        Shape::RotatedSquare => {
            // Alternate glyphs every 45° so the spin is visible.
            let glyph = if (d.rotation.rem_euclid(90.0)) < 45.0 { "◆" } else { "■" };
            out.queue(cursor::MoveTo(view.left + c0, view.top + r0))?;
            out.queue(Print(glyph))?;
        }
        Shape::Heart | Shape::Overlay => {}
    }
    Ok(())
}

// ── Side panel ────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, model: &RenderModel) -> std::io::Result<()> {
    let col = view.panel_col();
    let hud = &model.hud;

    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(cursor::MoveTo(col, 1))?;
    out.queue(Print(format!("Score: {:>8}", hud.score)))?;
    out.queue(cursor::MoveTo(col, 2))?;
    out.queue(Print(format!("High:  {:>8}", hud.high_score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(cursor::MoveTo(col, 4))?;
    out.queue(Print(format!("Grenades: {}", hud.grenades)))?;

    out.queue(cursor::MoveTo(col, 5))?;
    out.queue(Print("Ship: "))?;
    out.queue(style::SetForegroundColor(rgb(ship_color(hud.ship))))?;
    out.queue(Print(format!("Player {}", hud.ship.number())))?;

    out.queue(style::SetForegroundColor(difficulty_color(hud.difficulty)))?;
    out.queue(cursor::MoveTo(col, 6))?;
    out.queue(Print(format!("[ {} ]", hud.difficulty.label())))?;

    // Hearts keep their panel grid: one icon per two columns, one row each.
    out.queue(style::SetForegroundColor(C_HUD_LABEL))?;
    out.queue(cursor::MoveTo(col, 8))?;
    out.queue(Print("Lives"))?;
    if let Some(first) = model.hearts.first() {
        for heart in &model.hearts {
            let slot = ((heart.x - first.x) / HEART_SPACING).round() as u16;
            let row = ((heart.y - first.y) / HEART_SPACING).round() as u16;
            out.queue(style::SetForegroundColor(rgb(heart.color)))?;
            out.queue(cursor::MoveTo(col + slot * 2, 9 + row))?;
            out.queue(Print("♥"))?;
        }
    }
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, view: &Viewport, model: &RenderModel) -> std::io::Result<()> {
    let title = "★  DANMAKU  SHOOTER  ★";
    let ready = match model.hud.countdown_secs {
        Some(secs) => format!("READY  {secs}"),
        None => "READY".to_string(),
    };
    let cx = view.left + view.cols / 2;
    let cy = view.top + view.rows / 3;
    for (i, (text, color)) in [(title.to_string(), Color::Cyan), (ready, Color::White)]
        .into_iter()
        .enumerate()
    {
        out.queue(cursor::MoveTo(cx.saturating_sub(text.chars().count() as u16 / 2), cy + i as u16 * 2))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(&text))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "Arrows/WASD: Move  Z/Space: Shoot  X: Grenade  B: Boss  M: Menu  Q: Quit",
    ))?;
    Ok(())
}

// ── Player select ─────────────────────────────────────────────────────────────

pub fn render_menu<W: Write>(
    out: &mut W,
    menu: &SelectMenu,
    high_score: u32,
    term: (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cx = term.0 / 2;
    let cy = term.1 / 2;

    let centered = |text: &str| cx.saturating_sub(text.chars().count() as u16 / 2);

    let title = "★  DANMAKU  SHOOTER  ★";
    out.queue(cursor::MoveTo(centered(title), cy.saturating_sub(7)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs = format!("Best Score: {high_score}");
        out.queue(cursor::MoveTo(centered(&hs), cy.saturating_sub(6)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs))?;
    }

    let focus_color = |focus: SelectFocus| {
        if menu.focus == focus {
            Color::White
        } else {
            Color::DarkGrey
        }
    };

    let ship = format!("◀  Player {}  ▶", menu.ship.number());
    out.queue(cursor::MoveTo(centered(&ship), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(focus_color(SelectFocus::Ship)))?;
    out.queue(Print(&ship))?;

    out.queue(cursor::MoveTo(cx, cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(rgb(ship_color(menu.ship))))?;
    out.queue(Print("▲"))?;
    out.queue(cursor::MoveTo(cx.saturating_sub(1), cy))?;
    out.queue(Print("/█\\"))?;

    let difficulty = format!("◀  {}  ▶", menu.difficulty.label());
    out.queue(cursor::MoveTo(centered(&difficulty), cy + 2))?;
    out.queue(style::SetForegroundColor(match menu.focus {
        SelectFocus::Difficulty => difficulty_color(menu.difficulty),
        SelectFocus::Ship => Color::DarkGrey,
    }))?;
    out.queue(Print(&difficulty))?;

    let lives = format!("Lives: {}", menu.session().starting_lives());
    out.queue(cursor::MoveTo(centered(&lives), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::Red))?;
    out.queue(Print(&lives))?;

    let hint = "← →: Change   ↑ ↓: Switch   Enter: Start   Q: Quit";
    out.queue(cursor::MoveTo(centered(hint), cy + 7))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Game-over screen ──────────────────────────────────────────────────────────

pub fn render_game_over<W: Write>(
    out: &mut W,
    score: u32,
    high_score: u32,
    term: (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let new_best = score >= high_score && score > 0;
    let score_line = format!("Final Score: {score:>8}");
    let best_line = if new_best {
        format!("★ NEW BEST: {high_score:>8} ★")
    } else {
        format!("Best Score:  {high_score:>8}")
    };

    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Back to Select  Q - Quit", Color::White),
    ];

    let cx = term.0 / 2;
    let start_row = (term.1 / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
