/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::translator::code_writer::CodeWriter;

impl CodeWriter {
    // Labels inside a function body live under the function's namespace,
    // so identical names in different functions stay distinct.
    fn scoped_label(&self, label: &str) -> String {
        if self.current_function.is_empty() {
            label.to_string()
        } else {
            format!("{}${label}", self.current_function)
        }
    }

    pub(super) fn write_label(&mut self, label: &str) {
        let scoped = self.scoped_label(label);
        self.emit(&format!("({scoped})"));
    }

    pub(super) fn write_goto(&mut self, label: &str) {
        let scoped = self.scoped_label(label);
        self.emit(&format!("@{scoped}"));
        self.emit("0;JMP");
    }

    // if-goto pops the top of stack and branches when it is nonzero.
    pub(super) fn write_if_goto(&mut self, label: &str) {
        let scoped = self.scoped_label(label);
        self.pop_d();
        self.emit(&format!("@{scoped}"));
        self.emit("D;JNE");
    }
}
