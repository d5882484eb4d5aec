//! Viewer state and key handling, independent of the terminal

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashSet;

use super::cursor::Cursor;
use crate::model::{ResultTree, Tag, TagKind};
use crate::navigation::IntegrationTreeModel;
use crate::render::{GraphRenderer, RenderPipeline, SelectionOutcome};

/// How the image pane maps image pixels to terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Scale the whole image into the pane
    Fit,
    /// One pixel per half cell, panned with H/J/K/L
    Actual,
}

/// One visible line of the tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub tag: Tag,
    pub depth: usize,
    pub label: &'a str,
    pub container: bool,
    pub expanded: bool,
    pub last_sibling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    None,
    SelectionChanged,
    Quit,
}

const PAN_STEP: u32 = 8;

pub struct App<'a, R: GraphRenderer> {
    tree: &'a ResultTree,
    pipeline: RenderPipeline<R>,
    expanded: HashSet<Tag>,
    pub cursor: Cursor,
    pub tree_offset: usize,
    pub tree_viewport_height: usize,
    pub view_mode: ViewMode,
    pub pan: (u32, u32),
    pub status: String,
    pub should_quit: bool,
    shut_down: bool,
}

impl<'a, R: GraphRenderer> App<'a, R> {
    pub fn new(tree: &'a ResultTree, pipeline: RenderPipeline<R>) -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(tree.root_tag());
        let mut app = Self {
            tree,
            pipeline,
            expanded,
            cursor: Cursor::new(0),
            tree_offset: 0,
            tree_viewport_height: 20,
            view_mode: ViewMode::Fit,
            pan: (0, 0),
            status: "Select an attempt to render its graph".to_string(),
            should_quit: false,
            shut_down: false,
        };
        let len = app.visible_rows().len();
        app.cursor.update_len(len);
        app
    }

    pub fn model(&self) -> IntegrationTreeModel<'a> {
        IntegrationTreeModel::new(self.tree)
    }

    pub fn tree(&self) -> &'a ResultTree {
        self.tree
    }

    pub fn pipeline(&self) -> &RenderPipeline<R> {
        &self.pipeline
    }

    pub fn is_expanded(&self, tag: Tag) -> bool {
        self.expanded.contains(&tag)
    }

    /// Rows of the expanded part of the tree, built only through the adapter
    pub fn visible_rows(&self) -> Vec<TreeRow<'a>> {
        let model = self.model();
        let mut rows = Vec::new();
        self.push_rows(&model, None, 0, &mut rows);
        rows
    }

    fn push_rows(
        &self,
        model: &IntegrationTreeModel<'a>,
        parent: Option<Tag>,
        depth: usize,
        rows: &mut Vec<TreeRow<'a>>,
    ) {
        let children = model.children_of(parent);
        let count = children.len();
        for (i, tag) in children.into_iter().enumerate() {
            let container = model.is_container(Some(tag));
            let expanded = container && self.expanded.contains(&tag);
            rows.push(TreeRow {
                tag,
                depth,
                label: model.label(Some(tag)),
                container,
                expanded,
                last_sibling: i + 1 == count,
            });
            if expanded {
                self.push_rows(model, Some(tag), depth + 1, rows);
            }
        }
    }

    pub fn selected_tag(&self) -> Option<Tag> {
        self.visible_rows().get(self.cursor.pos()).map(|row| row.tag)
    }

    fn row_index_of(&self, tag: Tag) -> Option<usize> {
        self.visible_rows().iter().position(|row| row.tag == tag)
    }

    fn refresh_rows(&mut self) {
        let len = self.visible_rows().len();
        self.cursor.update_len(len);
        self.ensure_cursor_visible();
    }

    pub fn expand(&mut self, tag: Tag) -> bool {
        if !self.model().is_container(Some(tag)) {
            return false;
        }
        let changed = self.expanded.insert(tag);
        self.refresh_rows();
        changed
    }

    /// Collapsing keeps the cursor on the collapsed row
    pub fn collapse(&mut self, tag: Tag) -> bool {
        let changed = self.expanded.remove(&tag);
        if changed {
            if let Some(index) = self.row_index_of(tag) {
                self.cursor.set_pos(index);
            }
            self.refresh_rows();
        }
        changed
    }

    /// Expand every ancestor of `tag` and put the cursor on it
    pub fn reveal(&mut self, tag: Tag) -> bool {
        for ancestor in self.model().ancestors(tag) {
            self.expanded.insert(ancestor);
        }
        self.refresh_rows();
        match self.row_index_of(tag) {
            Some(index) => {
                let moved = self.cursor.set_pos(index);
                self.ensure_cursor_visible();
                moved
            }
            None => false,
        }
    }

    pub fn ensure_cursor_visible(&mut self) {
        let height = self.tree_viewport_height.max(1);
        let pos = self.cursor.pos();
        if pos < self.tree_offset {
            self.tree_offset = pos;
        } else if pos >= self.tree_offset + height {
            self.tree_offset = pos + 1 - height;
        }
    }

    /// Run the rendering pipeline for the row under the cursor
    pub fn select_current(&mut self) {
        let tag = self.selected_tag();
        let outcome = self.pipeline.select(self.tree, tag);
        self.pan = (0, 0);
        self.status = match (outcome, tag) {
            (SelectionOutcome::Ignored, Some(tag)) if tag.kind() == TagKind::Peel => {
                "Loop rows only expand; select an iteration to render it".to_string()
            }
            (SelectionOutcome::Ignored, _) => String::new(),
            (SelectionOutcome::Displayed, _) => match self.pipeline.last_failure() {
                Some(failure) => failure.to_string(),
                None => {
                    let image = self.pipeline.current_image();
                    format!("Rendered {}x{}", image.width(), image.height())
                }
            },
        };
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        if key.kind != KeyEventKind::Press {
            return KeyResult::None;
        }

        let page = self.tree_viewport_height.max(1);
        let moved = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return KeyResult::Quit;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return KeyResult::Quit;
            }
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_down(),
            KeyCode::PageUp => self.cursor.page_up(page),
            KeyCode::PageDown => self.cursor.page_down(page),
            KeyCode::Home | KeyCode::Char('g') => self.cursor.home(),
            KeyCode::End | KeyCode::Char('G') => self.cursor.end(),
            KeyCode::Right | KeyCode::Char('l') => {
                let Some(tag) = self.selected_tag() else {
                    return KeyResult::None;
                };
                if self.is_expanded(tag) {
                    self.cursor.move_down()
                } else {
                    self.expand(tag);
                    false
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let Some(tag) = self.selected_tag() else {
                    return KeyResult::None;
                };
                if self.is_expanded(tag) {
                    self.collapse(tag);
                    false
                } else {
                    match self.model().parent_of(Some(tag)) {
                        Some(parent) => self.reveal(parent),
                        None => false,
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(tag) = self.selected_tag() {
                    if self.is_expanded(tag) {
                        self.collapse(tag);
                    } else {
                        self.expand(tag);
                    }
                }
                false
            }
            KeyCode::Char('r') => return KeyResult::SelectionChanged,
            KeyCode::Char('z') => {
                self.view_mode = match self.view_mode {
                    ViewMode::Fit => ViewMode::Actual,
                    ViewMode::Actual => ViewMode::Fit,
                };
                self.pan = (0, 0);
                false
            }
            KeyCode::Char('H') => {
                self.pan.0 = self.pan.0.saturating_sub(PAN_STEP);
                false
            }
            KeyCode::Char('L') => {
                self.pan.0 = self.pan.0.saturating_add(PAN_STEP);
                false
            }
            KeyCode::Char('K') => {
                self.pan.1 = self.pan.1.saturating_sub(PAN_STEP);
                false
            }
            KeyCode::Char('J') => {
                self.pan.1 = self.pan.1.saturating_add(PAN_STEP);
                false
            }
            _ => false,
        };

        if moved {
            self.ensure_cursor_visible();
            KeyResult::SelectionChanged
        } else {
            KeyResult::None
        }
    }

    /// Teardown hook; removes the render workspace once
    pub fn shutdown(&mut self) {
        if !self.shut_down {
            self.shut_down = true;
            self.pipeline.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ViewerError, ViewerResult};
    use crate::model::ResultTreeBuilder;
    use crate::render::RasterFormat;
    use crate::workspace::{RenderWorkspace, DEFAULT_PREFIX};
    use std::cell::Cell;
    use std::path::Path;

    #[derive(Default)]
    struct CountingRenderer {
        calls: Cell<usize>,
    }

    impl GraphRenderer for CountingRenderer {
        fn render(&self, _input: &Path, _output: &Path) -> ViewerResult<()> {
            self.calls.set(self.calls.get() + 1);
            Err(ViewerError::RendererFailed {
                command: "dot".to_string(),
                status: "exit status: 1".to_string(),
                stderr: String::new(),
            })
        }

        fn describe(&self, _input: &Path, _output: &Path) -> String {
            "dot".to_string()
        }
    }

    fn tree() -> ResultTree {
        let mut b = ResultTreeBuilder::new("main");
        let root = b.root();
        let helper = b.add_call(root, "helper");
        b.add_call(helper, "leaf");
        let peel = b.add_peel(root, "for.body");
        b.add_iteration(peel, "iteration 0");
        b.add_iteration(peel, "iteration 1");
        b.build()
    }

    fn app(tree: &ResultTree) -> App<'_, CountingRenderer> {
        let ws = RenderWorkspace::acquire(DEFAULT_PREFIX, RasterFormat::Png).unwrap();
        App::new(tree, RenderPipeline::new(ws, CountingRenderer::default()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn labels<R: GraphRenderer>(app: &App<'_, R>) -> Vec<String> {
        app.visible_rows()
            .iter()
            .map(|row| format!("{}{}", "  ".repeat(row.depth), row.label))
            .collect()
    }

    #[test]
    fn test_root_starts_expanded() {
        let tree = tree();
        let app = app(&tree);
        assert_eq!(labels(&app), vec!["main", "  helper", "  for.body"]);
        assert_eq!(app.cursor.len(), 3);
        assert!(app.pipeline().current_image().is_placeholder());
    }

    #[test]
    fn test_cursor_move_is_selection_change() {
        let tree = tree();
        let mut app = app(&tree);
        assert_eq!(app.on_key(press(KeyCode::Down)), KeyResult::SelectionChanged);
        assert_eq!(app.on_key(press(KeyCode::Up)), KeyResult::SelectionChanged);
        assert_eq!(app.on_key(press(KeyCode::Up)), KeyResult::None);
    }

    #[test]
    fn test_expand_and_collapse_loop() {
        let tree = tree();
        let mut app = app(&tree);
        app.cursor.set_pos(2);
        app.on_key(press(KeyCode::Enter));
        assert_eq!(
            labels(&app),
            vec!["main", "  helper", "  for.body", "    iteration 0", "    iteration 1"]
        );
        app.on_key(press(KeyCode::Left));
        assert_eq!(labels(&app), vec!["main", "  helper", "  for.body"]);
        assert_eq!(app.cursor.pos(), 2);
    }

    #[test]
    fn test_left_on_collapsed_row_jumps_to_parent() {
        let tree = tree();
        let mut app = app(&tree);
        app.cursor.set_pos(1);
        assert_eq!(app.on_key(press(KeyCode::Left)), KeyResult::SelectionChanged);
        assert_eq!(app.selected_tag(), Some(tree.root_tag()));
    }

    #[test]
    fn test_leaf_rows_do_not_expand() {
        let tree = tree();
        let mut app = app(&tree);
        app.cursor.set_pos(1);
        app.on_key(press(KeyCode::Right));
        app.cursor.set_pos(2);
        let leaf = app.selected_tag().unwrap();
        assert_eq!(app.model().label(Some(leaf)), "leaf");
        assert!(!app.expand(leaf));
    }

    #[test]
    fn test_selecting_loop_never_renders() {
        let tree = tree();
        let mut app = app(&tree);
        app.cursor.set_pos(2);
        app.select_current();
        assert_eq!(app.pipeline().renderer().calls.get(), 0);
        assert!(app.status.starts_with("Loop rows only expand"));
    }

    #[test]
    fn test_reselect_renders_again() {
        let tree = tree();
        let mut app = app(&tree);
        assert_eq!(app.on_key(press(KeyCode::Char('r'))), KeyResult::SelectionChanged);
        app.select_current();
        app.select_current();
        assert_eq!(app.pipeline().renderer().calls.get(), 2);
        assert!(app.pipeline().current_image().is_placeholder());
        assert!(app.status.starts_with("[rendering]"));
    }

    #[test]
    fn test_quit_and_shutdown() {
        let tree = tree();
        let mut app = app(&tree);
        let dir = app.pipeline().workspace().dir().to_path_buf();
        assert_eq!(app.on_key(press(KeyCode::Char('q'))), KeyResult::Quit);
        assert!(app.should_quit);
        app.shutdown();
        app.shutdown();
        assert!(!dir.exists());
    }

    #[test]
    fn test_reveal_expands_ancestors() {
        let tree = tree();
        let mut app = app(&tree);
        let target = app.model().resolve_path("1/1").unwrap();
        app.reveal(target);
        assert_eq!(app.selected_tag(), Some(target));
        assert!(app.is_expanded(app.model().resolve_path("1").unwrap()));
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let tree = tree();
        let mut app = app(&tree);
        app.tree_viewport_height = 2;
        app.cursor.set_pos(2);
        app.ensure_cursor_visible();
        assert_eq!(app.tree_offset, 1);
        app.cursor.home();
        app.ensure_cursor_visible();
        assert_eq!(app.tree_offset, 0);
    }
}
