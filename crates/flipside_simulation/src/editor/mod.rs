//! Редактор формы платформы: черновик полигона и текстовый экспорт
//!
//! Host-UI ловит клики мышью и командует черновиком: begin → add_vertex* →
//! try_close. Замыкание формы с < 3 вершинами отклоняется со статусом и БЕЗ
//! мутации состояния. Завершённый черновик конвертируется в `PlatformShape`
//! (вершины пересчитываются относительно центра).
//!
//! Экспорт — текстовый список целочисленных пар, пригодный как литеральные
//! данные уровня:
//!
//! ```text
//! [
//!   { x: -120, y: -40 },
//!   { x: 120, y: -40 },
//!   { x: 0, y: 60 }
//! ]
//! ```
//!
//! `parse_vertices` читает тот же формат обратно (раунд-трип с допуском ±1
//! на округление).

use bevy::prelude::*;
use std::fmt;

use crate::platform::PlatformShape;

/// Фаза черновика
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftMode {
    /// Редактор выключен
    #[default]
    Disabled,
    /// Кликами добавляются вершины
    Drawing,
    /// Форма замкнута и валидна (≥3 вершин)
    Completed,
}

/// Ошибка операции над черновиком
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    NotDrawing,
    TooFewVertices { count: usize },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::NotDrawing => write!(f, "shape is not being drawn"),
            ShapeError::TooFewVertices { count } => {
                write!(f, "need at least 3 vertices to close the shape, got {}", count)
            }
        }
    }
}

/// Ошибка разбора текстового дампа вершин
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeParseError {
    /// Строка (1-based) не распарсилась как `{ x: N, y: M }`
    BadLine { line: usize },
}

impl fmt::Display for ShapeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeParseError::BadLine { line } => {
                write!(f, "line {}: expected '{{ x: N, y: M }}'", line)
            }
        }
    }
}

/// Черновик полигона платформы (вершины в абсолютных координатах экрана)
#[derive(Resource, Debug, Clone, Default)]
pub struct ShapeDraft {
    pub mode: DraftMode,
    vertices: Vec<Vec2>,
}

impl ShapeDraft {
    /// Начать рисование с чистого листа
    pub fn begin(&mut self) {
        self.mode = DraftMode::Drawing;
        self.vertices.clear();
    }

    /// Добавить вершину. Вне режима Drawing — молча игнорируется.
    pub fn add_vertex(&mut self, point: Vec2) {
        if self.mode != DraftMode::Drawing {
            return;
        }
        self.vertices.push(point);
    }

    /// Замкнуть форму. С < 3 вершинами отклоняется без мутации состояния.
    pub fn try_close(&mut self) -> Result<(), ShapeError> {
        if self.mode != DraftMode::Drawing {
            return Err(ShapeError::NotDrawing);
        }
        if self.vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices {
                count: self.vertices.len(),
            });
        }
        self.mode = DraftMode::Completed;
        Ok(())
    }

    /// Сбросить черновик и продолжить рисование заново
    pub fn reset(&mut self) {
        self.mode = DraftMode::Drawing;
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Вершины относительно заданного центра
    pub fn relative_vertices(&self, center: Vec2) -> Vec<Vec2> {
        self.vertices.iter().map(|v| *v - center).collect()
    }

    /// Текстовый дамп (см. док модуля). С < 3 вершинами отклоняется.
    pub fn export_string(&self, center: Vec2) -> Result<String, ShapeError> {
        if self.vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices {
                count: self.vertices.len(),
            });
        }
        let lines: Vec<String> = self
            .relative_vertices(center)
            .iter()
            .map(|v| format!("  {{ x: {}, y: {} }}", v.x.round() as i64, v.y.round() as i64))
            .collect();
        Ok(format!("[\n{}\n]", lines.join(",\n")))
    }

    /// Завершённый черновик → форма платформы с данным центром
    pub fn build_shape(&self, center: Vec2) -> Option<PlatformShape> {
        if self.mode != DraftMode::Completed {
            return None;
        }
        PlatformShape::from_vertices(self.relative_vertices(center))
    }
}

/// Разбор текстового дампа вершин (формат `export_string`)
pub fn parse_vertices(text: &str) -> Result<Vec<Vec2>, ShapeParseError> {
    let mut vertices = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim().trim_end_matches(',').trim();
        if line.is_empty() || line == "[" || line == "]" {
            continue;
        }

        let inner = line
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or(ShapeParseError::BadLine { line: line_no })?;

        let mut x = None;
        let mut y = None;
        for part in inner.split(',') {
            let (key, value) = part
                .split_once(':')
                .ok_or(ShapeParseError::BadLine { line: line_no })?;
            let value: f32 = value
                .trim()
                .parse()
                .map_err(|_| ShapeParseError::BadLine { line: line_no })?;
            match key.trim() {
                "x" => x = Some(value),
                "y" => y = Some(value),
                _ => return Err(ShapeParseError::BadLine { line: line_no }),
            }
        }

        match (x, y) {
            (Some(x), Some(y)) => vertices.push(Vec2::new(x, y)),
            _ => return Err(ShapeParseError::BadLine { line: line_no }),
        }
    }

    Ok(vertices)
}
